// ==========================================
// 三班轮值排班系统 - 局部修复建议器
// ==========================================
// 职责: 针对单条冲突给出保持定员的最小修改 (单人移动 或 两人互换)
// 红线: 锁定单元格不可触碰; 只修改今天及以后的单元格
// 红线: 不满足全部守卫条件时返回空建议, 调用方必须容忍
// 每次只产出一条修改建议, 多处冲突由调用方逐条修复后重新校验
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::schedule::DailySchedule;
use crate::domain::types::{ShiftKind, ViolationKind};
use crate::domain::Roster;
use crate::engine::validator::Violation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

// ==========================================
// ShiftChange - 单元格修改
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftChange {
    pub date: NaiveDate,
    pub employee_id: String,
    pub from_shift: ShiftKind,
    pub to_shift: ShiftKind,
}

// ==========================================
// RepairSuggestion - 修复建议
// ==========================================
// changes 长度为1 (单人移动) 或 2 (两人互换, 两条修改的班次互为反向)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairSuggestion {
    pub description: String,
    pub changes: Vec<ShiftChange>,
}

// ==========================================
// RepairAdvisor - 修复建议器
// ==========================================
pub struct RepairAdvisor<'a> {
    roster: &'a Roster,
    config: &'a ScheduleConfig,
    pinned: HashSet<(String, NaiveDate)>,
    today: NaiveDate,
}

impl<'a> RepairAdvisor<'a> {
    pub fn new(
        roster: &'a Roster,
        config: &'a ScheduleConfig,
        pinned: impl IntoIterator<Item = (String, NaiveDate)>,
        today: NaiveDate,
    ) -> Self {
        Self {
            roster,
            config,
            pinned: pinned.into_iter().collect(),
            today,
        }
    }

    /// 针对单条冲突产出修复建议
    pub fn advise(
        &self,
        violation: &Violation,
        schedules: &[DailySchedule],
    ) -> Option<RepairSuggestion> {
        let suggestion = match violation.kind {
            ViolationKind::SlotCountMismatch => self.repair_slot_count(violation, schedules),
            ViolationKind::ConsecutiveViolation => self.repair_consecutive(violation, schedules),
            ViolationKind::ChiefMissing => self.repair_chief_missing(violation, schedules),
            ViolationKind::ChiefDuplicate => self.repair_chief_duplicate(violation, schedules),
            // 其余冲突类型没有安全的局部修复, 交由重新求解处理
            _ => None,
        };

        debug!(
            kind = %violation.kind,
            date = ?violation.date,
            found = suggestion.is_some(),
            "修复建议计算完成"
        );
        suggestion
    }

    // ==========================================
    // 冲突类型: 班次人数不符
    // ==========================================
    // 从超员班次挑一名可移动员工补到缺员班次; 无缺员班次则不给建议
    fn repair_slot_count(
        &self,
        violation: &Violation,
        schedules: &[DailySchedule],
    ) -> Option<RepairSuggestion> {
        let date = violation.date?;
        let day = find_day(schedules, date)?;
        let members = members_by_shift(day);

        let mut over: Vec<ShiftKind> = Vec::new();
        let mut under: Vec<ShiftKind> = Vec::new();
        for s in ShiftKind::WORKING {
            let actual = members.get(&s).map(|m| m.len()).unwrap_or(0);
            let required = self.config.quota.count(s) as usize;
            if actual > required {
                over.push(s);
            } else if actual < required {
                under.push(s);
            }
        }

        let from_shift = *over.first()?;
        let to_shift = *under.first()?;

        // 候选按序列顺序, 普通席优先, 避免顺手抽走夜班主任
        let mut candidates: Vec<&String> = members.get(&from_shift)?.iter().collect();
        candidates.sort_by_key(|id| {
            (
                self.roster.is_chief(id),
                self.roster.position_of(id).unwrap_or(usize::MAX),
            )
        });
        let mover = candidates
            .into_iter()
            .find(|id| self.movable(id, date))?;

        Some(RepairSuggestion {
            description: format!(
                "{} {}超员, 将{}调整到{}",
                date,
                from_shift.display_name(),
                self.name_of(mover),
                to_shift.display_name()
            ),
            changes: vec![ShiftChange {
                date,
                employee_id: mover.clone(),
                from_shift,
                to_shift,
            }],
        })
    }

    // ==========================================
    // 冲突类型: 小夜/大夜连续
    // ==========================================
    // 在次日找一名别的班次的员工与当事人互换, 且互换不得制造新的连续
    fn repair_consecutive(
        &self,
        violation: &Violation,
        schedules: &[DailySchedule],
    ) -> Option<RepairSuggestion> {
        let shift = violation.shift?;
        // 白班/睡觉班允许连续, 不做修复
        if !matches!(shift, ShiftKind::MiniNight | ShiftKind::LateNight) {
            return None;
        }
        let first_date = violation.date?;
        let offender = violation.employee_ids.first()?;

        let mut ordered: Vec<&DailySchedule> = schedules.iter().collect();
        ordered.sort_by_key(|s| s.date);
        let first_idx = ordered.iter().position(|s| s.date == first_date)?;
        let second = ordered.get(first_idx + 1)?;
        let third_shift_of = |emp: &str| {
            ordered
                .get(first_idx + 2)
                .and_then(|day| day.shift_of(emp))
        };

        // 当事人在次日仍上同一夜班
        if second.shift_of(offender) != Some(shift) || !self.movable(offender, second.date) {
            return None;
        }

        for candidate in second.records.iter() {
            let other_shift = candidate.shift_kind;
            if !other_shift.is_working() || other_shift == shift {
                continue;
            }
            let emp = &candidate.employee_id;
            // (a) 未锁定
            if !self.movable(emp, second.date) {
                continue;
            }
            // (b) 候选人前一天不在该夜班上, 否则换过来立即形成新连续
            if ordered[first_idx].shift_of(emp) == Some(shift) {
                continue;
            }
            // (c) 候选人后一天也不在该夜班上
            if third_shift_of(emp) == Some(shift) {
                continue;
            }
            // 当事人换去的目标若也是夜班, 同样不得与后一天形成连续
            if matches!(other_shift, ShiftKind::MiniNight | ShiftKind::LateNight)
                && third_shift_of(offender) == Some(other_shift)
            {
                continue;
            }
            // 首位员工只能上白班/睡觉班, 不可被换入夜班
            if self.roster.is_anchor(emp) {
                continue;
            }

            return Some(RepairSuggestion {
                description: format!(
                    "{} 连续{}: {} 与 {} 在 {} 互换班次",
                    self.name_of(offender),
                    shift.display_name(),
                    self.name_of(offender),
                    self.name_of(emp),
                    second.date
                ),
                changes: vec![
                    ShiftChange {
                        date: second.date,
                        employee_id: offender.clone(),
                        from_shift: shift,
                        to_shift: other_shift,
                    },
                    ShiftChange {
                        date: second.date,
                        employee_id: emp.clone(),
                        from_shift: other_shift,
                        to_shift: shift,
                    },
                ],
            });
        }
        None
    }

    // ==========================================
    // 冲突类型: 夜班缺主任席
    // ==========================================
    // 从持有主任的班次借一名主任换入, 绝不抽走夜班仅剩的主任
    fn repair_chief_missing(
        &self,
        violation: &Violation,
        schedules: &[DailySchedule],
    ) -> Option<RepairSuggestion> {
        let date = violation.date?;
        let shift = violation.shift?;
        let day = find_day(schedules, date)?;
        let members = members_by_shift(day);

        // 缺主任的班次里找一名可移出的普通席
        let staff_out = members
            .get(&shift)?
            .iter()
            .find(|id| !self.roster.is_chief(id) && self.movable(id, date))?;

        for donor_shift in ShiftKind::WORKING {
            if donor_shift == shift {
                continue;
            }
            let donor_members = members.get(&donor_shift).cloned().unwrap_or_default();
            let chiefs: Vec<&String> = donor_members
                .iter()
                .filter(|id| self.roster.is_chief(id))
                .collect();
            // 夜班必须保留至少一名主任
            let spare = if donor_shift.is_night() {
                chiefs.len() > 1
            } else {
                !chiefs.is_empty()
            };
            if !spare {
                continue;
            }
            // 首位员工不可被换去夜班
            let Some(chief_in) = chiefs
                .into_iter()
                .find(|id| self.movable(id, date) && !self.roster.is_anchor(id))
            else {
                continue;
            };

            return Some(RepairSuggestion {
                description: format!(
                    "{} {}缺主任席: {} 与 {} 互换班次",
                    date,
                    shift.display_name(),
                    self.name_of(chief_in),
                    self.name_of(staff_out)
                ),
                changes: vec![
                    ShiftChange {
                        date,
                        employee_id: chief_in.clone(),
                        from_shift: donor_shift,
                        to_shift: shift,
                    },
                    ShiftChange {
                        date,
                        employee_id: staff_out.clone(),
                        from_shift: shift,
                        to_shift: donor_shift,
                    },
                ],
            });
        }
        None
    }

    // ==========================================
    // 冲突类型: 夜班主任席重复
    // ==========================================
    // 多余主任换去缺主任的夜班 (优先) 或白班, 与对方班次的普通席互换
    fn repair_chief_duplicate(
        &self,
        violation: &Violation,
        schedules: &[DailySchedule],
    ) -> Option<RepairSuggestion> {
        let date = violation.date?;
        let shift = violation.shift?;
        let day = find_day(schedules, date)?;
        let members = members_by_shift(day);

        let chiefs: Vec<String> = members
            .get(&shift)?
            .iter()
            .filter(|id| self.roster.is_chief(id))
            .cloned()
            .collect();
        if chiefs.len() < 2 {
            return None;
        }
        // 保留第一名主任, 移出多余的第一名可移动主任
        let extra = chiefs
            .iter()
            .skip(1)
            .find(|id| self.movable(id, date) && !self.roster.is_anchor(id))?;

        // 目标: 优先补缺主任的夜班, 否则白班
        let mut targets: Vec<ShiftKind> = ShiftKind::NIGHT
            .iter()
            .copied()
            .filter(|s| *s != shift)
            .filter(|s| {
                members
                    .get(s)
                    .map(|m| !m.iter().any(|id| self.roster.is_chief(id)))
                    .unwrap_or(false)
            })
            .collect();
        targets.push(ShiftKind::Day);

        for target in targets {
            let Some(target_members) = members.get(&target) else {
                continue;
            };
            let Some(counterpart) = target_members
                .iter()
                .find(|id| !self.roster.is_chief(id) && self.movable(id, date))
            else {
                continue;
            };

            return Some(RepairSuggestion {
                description: format!(
                    "{} {}主任席重复: {} 调整到{}, {} 换入",
                    date,
                    shift.display_name(),
                    self.name_of(extra),
                    target.display_name(),
                    self.name_of(counterpart)
                ),
                changes: vec![
                    ShiftChange {
                        date,
                        employee_id: (*extra).clone(),
                        from_shift: shift,
                        to_shift: target,
                    },
                    ShiftChange {
                        date,
                        employee_id: counterpart.clone(),
                        from_shift: target,
                        to_shift: shift,
                    },
                ],
            });
        }
        None
    }

    // ==========================================
    // 守卫条件
    // ==========================================

    /// 单元格可修改: 未锁定 且 日期不早于今天
    fn movable(&self, employee_id: &str, date: NaiveDate) -> bool {
        date >= self.today && !self.pinned.contains(&(employee_id.to_string(), date))
    }

    fn name_of(&self, id: &str) -> String {
        self.roster
            .by_id(id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

fn find_day(schedules: &[DailySchedule], date: NaiveDate) -> Option<&DailySchedule> {
    schedules.iter().find(|s| s.date == date)
}

/// 按班次归集当日在班员工 (序列顺序, 哨兵类型剔除)
fn members_by_shift(day: &DailySchedule) -> HashMap<ShiftKind, Vec<String>> {
    let mut members: HashMap<ShiftKind, Vec<String>> = HashMap::new();
    for record in &day.records {
        if record.shift_kind.is_working() {
            members
                .entry(record.shift_kind)
                .or_default()
                .push(record.employee_id.clone());
        }
    }
    members
}
