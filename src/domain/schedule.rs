// ==========================================
// 三班轮值排班系统 - 排班结果领域模型
// ==========================================
// 红线: 排班结果由单次求解原子产出, 核心不做局部修改
// ==========================================

use crate::domain::types::{SeatKind, ShiftKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// ShiftRecord - 单条排班记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub employee_id: String,        // 员工ID
    pub date: NaiveDate,            // 日期
    pub shift_kind: ShiftKind,      // 班次类型
    #[serde(default)]
    pub seat: Option<SeatKind>,     // 席位 (求解产出时分配; 输入数据可缺省)
}

// ==========================================
// DailySchedule - 单日排班
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySchedule {
    pub date: NaiveDate,            // 日期
    #[serde(default)]
    pub day_of_week: String,        // 星期 (周一..周日); 历史输入可缺省
    pub records: Vec<ShiftRecord>,  // 按员工序列顺序
}

impl DailySchedule {
    /// 指定班次的在班员工ID
    pub fn employees_on(&self, kind: ShiftKind) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.shift_kind == kind)
            .map(|r| r.employee_id.as_str())
            .collect()
    }

    /// 指定员工当日班次
    pub fn shift_of(&self, employee_id: &str) -> Option<ShiftKind> {
        self.records
            .iter()
            .find(|r| r.employee_id == employee_id)
            .map(|r| r.shift_kind)
    }
}

// ==========================================
// PinnedAssignment - 锁定单元格
// ==========================================
// 用户锁定的 (员工, 日期, 班次), 求解器必须原样保留
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinnedAssignment {
    pub employee_id: String,
    pub date: NaiveDate,
    pub shift_kind: ShiftKind,
}

// ==========================================
// ShiftDistribution - 单班次分布统计
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftDistribution {
    pub min: u32,
    pub max: u32,
    pub avg: f64,
    pub std_dev: f64,
    pub spread: u32, // max - min
}

// ==========================================
// ScheduleStatistics - 排班统计
// ==========================================
// 两套分布: 本月单独 / 本月+上月累计; 公平性评分 = 两月极差之和 (越低越公平)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleStatistics {
    pub total_work_days: usize,
    /// 本月各班次分布 (键为班次 token)
    pub shift_distributions: HashMap<ShiftKind, ShiftDistribution>,
    /// 两月累计各班次分布
    pub two_month_distributions: HashMap<ShiftKind, ShiftDistribution>,
    /// 本月每人各班次数量
    pub employee_shift_counts: HashMap<String, HashMap<ShiftKind, u32>>,
    /// 两月累计每人各班次数量
    pub two_month_employee_counts: HashMap<String, HashMap<ShiftKind, u32>>,
    /// 公平性评分
    pub fairness_score: u32,
    /// 是否存在上月历史数据
    pub has_previous_data: bool,
    /// 本次求解使用的随机种子 (用于复现)
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_schedule_lookups() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let schedule = DailySchedule {
            date,
            day_of_week: "周日".to_string(),
            records: vec![
                ShiftRecord {
                    employee_id: "E00".to_string(),
                    date,
                    shift_kind: ShiftKind::Day,
                    seat: Some(SeatKind::DayRegular),
                },
                ShiftRecord {
                    employee_id: "E01".to_string(),
                    date,
                    shift_kind: ShiftKind::LateNight,
                    seat: Some(SeatKind::LateNightChief),
                },
            ],
        };

        assert_eq!(schedule.employees_on(ShiftKind::LateNight), vec!["E01"]);
        assert_eq!(schedule.shift_of("E00"), Some(ShiftKind::Day));
        assert_eq!(schedule.shift_of("E99"), None);
    }

    #[test]
    fn test_shift_record_serde_wire_format() {
        let record = ShiftRecord {
            employee_id: "7".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
            shift_kind: ShiftKind::MiniNight,
            seat: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"2026-03-04\""));
        assert!(json.contains("\"MINI_NIGHT\""));
    }
}
