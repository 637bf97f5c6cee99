// ==========================================
// 三班轮值排班系统 - 员工与花名册领域模型
// ==========================================
// 红线: 序列顺序即显示顺序, 前6人具备主任席资格
// 红线: 首位员工 (序列0) 执行固定的 1白2睡 循环
// ==========================================

use crate::domain::types::ShiftKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Employee - 员工
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,                       // 员工ID (调用方提供的不透明字符串)
    pub name: String,                     // 姓名
    pub position: usize,                  // 序列位置 (0起)
    pub is_chief: bool,                   // 主任席资格 (构造时由序列位置派生)
    pub avoidance_group_id: Option<String>, // 所属避让组
}

// ==========================================
// AvoidanceGroup - 避让组
// ==========================================
// 组内成员不得在同一天上同一种班次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvoidanceGroup {
    pub id: String,
    pub employee_ids: Vec<String>,
}

impl AvoidanceGroup {
    /// 展开组内全部两两配对
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for i in 0..self.employee_ids.len() {
            for j in (i + 1)..self.employee_ids.len() {
                pairs.push((self.employee_ids[i].clone(), self.employee_ids[j].clone()));
            }
        }
        pairs
    }
}

// ==========================================
// Roster - 花名册
// ==========================================
// 不可变输入: 保持序列顺序, 提供按ID/按避让组的查找
#[derive(Debug, Clone)]
pub struct Roster {
    employees: Vec<Employee>,
    avoidance_groups: Vec<AvoidanceGroup>,
    index_by_id: HashMap<String, usize>,
}

impl Roster {
    /// 按序列顺序构建花名册
    ///
    /// 序列前 `chief_count` 人标记为主任席资格; 输入中已有的 `is_chief`
    /// 标记会被重新派生, 避免构建后依赖位置假设
    pub fn new(
        mut employees: Vec<Employee>,
        avoidance_groups: Vec<AvoidanceGroup>,
        chief_count: usize,
    ) -> Self {
        employees.sort_by_key(|e| e.position);
        for (idx, emp) in employees.iter_mut().enumerate() {
            emp.position = idx;
            emp.is_chief = idx < chief_count;
        }

        let index_by_id = employees
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.id.clone(), idx))
            .collect();

        Self {
            employees,
            avoidance_groups,
            index_by_id,
        }
    }

    /// 员工数
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// 按序列顺序迭代
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// 按序列位置取员工
    pub fn by_position(&self, position: usize) -> Option<&Employee> {
        self.employees.get(position)
    }

    /// 按ID取员工
    pub fn by_id(&self, id: &str) -> Option<&Employee> {
        self.index_by_id.get(id).map(|idx| &self.employees[*idx])
    }

    /// 按ID取序列位置
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// 首位员工 (固定 1白2睡 循环)
    pub fn anchor(&self) -> Option<&Employee> {
        self.employees.first()
    }

    /// 是否为首位员工
    pub fn is_anchor(&self, id: &str) -> bool {
        self.anchor().map(|e| e.id == id).unwrap_or(false)
    }

    /// 主任席资格员工, 按序列顺序
    pub fn chiefs(&self) -> impl Iterator<Item = &Employee> {
        self.employees.iter().filter(|e| e.is_chief)
    }

    /// 是否具备主任席资格
    pub fn is_chief(&self, id: &str) -> bool {
        self.by_id(id).map(|e| e.is_chief).unwrap_or(false)
    }

    /// 避让组列表
    pub fn avoidance_groups(&self) -> &[AvoidanceGroup] {
        &self.avoidance_groups
    }

    /// 首位员工在工作日序列第 i 天的固定班次
    ///
    /// `phase_offset` 来自历史推导: (i + offset) % 3 == 0 时为白班, 否则睡觉班
    pub fn anchor_shift_at(index: usize, phase_offset: usize) -> ShiftKind {
        if (index + phase_offset) % 3 == 0 {
            ShiftKind::Day
        } else {
            ShiftKind::Sleep
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_employee(id: &str, position: usize) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("员工{}", id),
            position,
            is_chief: false,
            avoidance_group_id: None,
        }
    }

    #[test]
    fn test_roster_derives_chiefs_from_position() {
        let employees = (0..17).map(|i| make_employee(&format!("E{:02}", i), i)).collect();
        let roster = Roster::new(employees, Vec::new(), 6);

        assert_eq!(roster.len(), 17);
        assert_eq!(roster.chiefs().count(), 6);
        assert!(roster.is_chief("E00"));
        assert!(roster.is_chief("E05"));
        assert!(!roster.is_chief("E06"));
        assert!(roster.is_anchor("E00"));
        assert!(!roster.is_anchor("E01"));
    }

    #[test]
    fn test_roster_reorders_by_position() {
        // 乱序输入按 position 重排
        let employees = vec![
            make_employee("B", 1),
            make_employee("C", 5),
            make_employee("A", 0),
        ];
        let roster = Roster::new(employees, Vec::new(), 6);
        assert_eq!(roster.anchor().unwrap().id, "A");
        assert_eq!(roster.position_of("C"), Some(2));
    }

    #[test]
    fn test_avoidance_group_pairs() {
        let group = AvoidanceGroup {
            id: "G1".to_string(),
            employee_ids: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        let pairs = group.pairs();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&("a".to_string(), "c".to_string())));
    }

    #[test]
    fn test_anchor_cycle_phase() {
        // offset=0: 白 睡 睡 白 ...
        assert_eq!(Roster::anchor_shift_at(0, 0), ShiftKind::Day);
        assert_eq!(Roster::anchor_shift_at(1, 0), ShiftKind::Sleep);
        assert_eq!(Roster::anchor_shift_at(2, 0), ShiftKind::Sleep);
        assert_eq!(Roster::anchor_shift_at(3, 0), ShiftKind::Day);
        // offset=1: 睡 睡 白 ...
        assert_eq!(Roster::anchor_shift_at(0, 1), ShiftKind::Sleep);
        assert_eq!(Roster::anchor_shift_at(2, 1), ShiftKind::Day);
        // offset=2: 睡 白 睡 ...
        assert_eq!(Roster::anchor_shift_at(0, 2), ShiftKind::Sleep);
        assert_eq!(Roster::anchor_shift_at(1, 2), ShiftKind::Day);
    }
}
