// ==========================================
// 三班轮值排班系统 - 排班校验器
// ==========================================
// 职责: 对整月排班做规则体检, 输出带类型的违规列表
// 用途: 驱动前端角标 + 为修复建议器提供冲突输入
// 红线: 所有违规必须输出可读的中文说明
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::schedule::DailySchedule;
use crate::domain::types::{ShiftKind, ViolationKind};
use crate::domain::Roster;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// Violation - 单条违规
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<ShiftKind>,
    pub employee_ids: Vec<String>,
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, date: NaiveDate, message: String) -> Self {
        Self {
            kind,
            date: Some(date),
            shift: None,
            employee_ids: Vec::new(),
            message,
        }
    }

    fn with_shift(mut self, shift: ShiftKind) -> Self {
        self.shift = Some(shift);
        self
    }

    fn with_employees(mut self, ids: Vec<String>) -> Self {
        self.employee_ids = ids;
        self
    }
}

// ==========================================
// ScheduleValidator - 排班校验器
// ==========================================
pub struct ScheduleValidator<'a> {
    config: &'a ScheduleConfig,
}

impl<'a> ScheduleValidator<'a> {
    pub fn new(config: &'a ScheduleConfig) -> Self {
        Self { config }
    }

    /// 校验整月排班
    pub fn validate_month(
        &self,
        schedules: &[DailySchedule],
        roster: &Roster,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();

        for schedule in schedules {
            violations.extend(self.validate_day(schedule, roster));
        }
        violations.extend(self.check_consecutive_nights(schedules, roster));
        violations.extend(self.check_night_windows(schedules, roster));
        violations.extend(self.check_spacing(schedules, roster));

        debug!(
            days = schedules.len(),
            violations = violations.len(),
            "整月校验完成"
        );
        violations
    }

    /// 校验单日排班: 定员 / 班次人数 / 主任席 / 避让 / 重复分配 / 首位员工班次
    pub fn validate_day(&self, schedule: &DailySchedule, roster: &Roster) -> Vec<Violation> {
        let mut violations = Vec::new();
        let date = schedule.date;

        // 哨兵类型不计入定员
        let active: Vec<_> = schedule
            .records
            .iter()
            .filter(|r| r.shift_kind.is_working())
            .collect();

        // 1. 总定员
        let required_total = self.config.quota.total() as usize;
        if active.len() != required_total {
            violations.push(Violation::new(
                ViolationKind::HeadcountMismatch,
                date,
                format!("定员不足: 需要{}人, 实际{}人", required_total, active.len()),
            ));
        }

        // 2. 各班次人数
        let mut members: HashMap<ShiftKind, Vec<String>> = HashMap::new();
        for record in &active {
            members
                .entry(record.shift_kind)
                .or_default()
                .push(record.employee_id.clone());
        }
        for s in ShiftKind::WORKING {
            let required = self.config.quota.count(s) as usize;
            let actual = members.get(&s).map(|m| m.len()).unwrap_or(0);
            if actual != required {
                violations.push(
                    Violation::new(
                        ViolationKind::SlotCountMismatch,
                        date,
                        format!(
                            "{}人数错误: 需要{}人, 实际{}人",
                            s.display_name(),
                            required,
                            actual
                        ),
                    )
                    .with_shift(s)
                    .with_employees(members.get(&s).cloned().unwrap_or_default()),
                );
            }
        }

        // 3. 夜班主任席
        for s in ShiftKind::NIGHT {
            let on_shift = members.get(&s).cloned().unwrap_or_default();
            let chiefs: Vec<String> = on_shift
                .iter()
                .filter(|id| roster.is_chief(id))
                .cloned()
                .collect();
            if chiefs.is_empty() {
                violations.push(
                    Violation::new(
                        ViolationKind::ChiefMissing,
                        date,
                        format!("{}缺少主任席(夜班长)", s.display_name()),
                    )
                    .with_shift(s)
                    .with_employees(on_shift),
                );
            } else if chiefs.len() > 1 {
                violations.push(
                    Violation::new(
                        ViolationKind::ChiefDuplicate,
                        date,
                        format!("{}存在多个主任席(夜班长)", s.display_name()),
                    )
                    .with_shift(s)
                    .with_employees(chiefs),
                );
            }
        }

        // 4. 避让组冲突
        for group in roster.avoidance_groups() {
            for (s, on_shift) in &members {
                let conflicting: Vec<String> = on_shift
                    .iter()
                    .filter(|id| group.employee_ids.contains(id))
                    .cloned()
                    .collect();
                if conflicting.len() > 1 {
                    let names = display_names(&conflicting, roster);
                    violations.push(
                        Violation::new(
                            ViolationKind::AvoidanceConflict,
                            date,
                            format!("{}存在避让冲突: {}", s.display_name(), names.join("、")),
                        )
                        .with_shift(*s)
                        .with_employees(conflicting),
                    );
                }
            }
        }

        // 5. 重复分配
        let mut seen = HashMap::new();
        let mut duplicates = Vec::new();
        for record in &active {
            if seen.insert(record.employee_id.clone(), ()).is_some() {
                duplicates.push(record.employee_id.clone());
            }
        }
        if !duplicates.is_empty() {
            let names = display_names(&duplicates, roster);
            violations.push(
                Violation::new(
                    ViolationKind::DuplicateAssignment,
                    date,
                    format!("员工重复分配: {}", names.join("、")),
                )
                .with_employees(duplicates),
            );
        }

        // 6. 首位员工只能上白班或睡觉班
        if let Some(anchor) = roster.anchor() {
            for record in &active {
                if record.employee_id == anchor.id
                    && !matches!(record.shift_kind, ShiftKind::Day | ShiftKind::Sleep)
                {
                    violations.push(
                        Violation::new(
                            ViolationKind::RoleMismatch,
                            date,
                            format!(
                                "{}只能排白班或睡觉班, 实际为{}",
                                anchor.name,
                                record.shift_kind.display_name()
                            ),
                        )
                        .with_shift(record.shift_kind)
                        .with_employees(vec![anchor.id.clone()]),
                    );
                }
            }
        }

        violations
    }

    /// 小夜班/大夜班相邻工作日连续 (白班/睡觉班允许连续)
    fn check_consecutive_nights(
        &self,
        schedules: &[DailySchedule],
        roster: &Roster,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        let per_employee = shifts_by_employee(schedules);

        for (emp_id, shifts) in &per_employee {
            for pair in shifts.windows(2) {
                let (d1, s1) = pair[0];
                let (d2, s2) = pair[1];
                if s1 == s2 && matches!(s1, ShiftKind::MiniNight | ShiftKind::LateNight) {
                    let name = display_name(emp_id, roster);
                    violations.push(
                        Violation::new(
                            ViolationKind::ConsecutiveViolation,
                            d1,
                            format!(
                                "{} 在 {} 和 {} 连续上{}",
                                name,
                                d1,
                                d2,
                                s1.display_name()
                            ),
                        )
                        .with_shift(s1)
                        .with_employees(vec![emp_id.clone()]),
                    );
                }
            }
        }
        violations
    }

    /// 滑动窗口: 任意连续4个工作日内夜班不得超过3个
    fn check_night_windows(
        &self,
        schedules: &[DailySchedule],
        roster: &Roster,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        let window = self.config.gaps.night_window_days;
        let max_nights = self.config.gaps.night_window_max;
        let per_employee = shifts_by_employee(schedules);

        for (emp_id, shifts) in &per_employee {
            if shifts.len() < window {
                continue;
            }
            for chunk in shifts.windows(window) {
                let nights = chunk.iter().filter(|(_, s)| s.is_night()).count();
                if nights > max_nights {
                    let name = display_name(emp_id, roster);
                    violations.push(
                        Violation::new(
                            ViolationKind::ConsecutiveViolation,
                            chunk[0].0,
                            format!(
                                "{} 自 {} 起的{}个工作日内夜班达{}个, 超过上限{}个",
                                name, chunk[0].0, window, nights, max_nights
                            ),
                        )
                        .with_employees(vec![emp_id.clone()]),
                    );
                }
            }
        }
        violations
    }

    /// 最小间隔: 大夜班间隔不足 / 非首位员工白班相邻
    fn check_spacing(&self, schedules: &[DailySchedule], roster: &Roster) -> Vec<Violation> {
        let mut violations = Vec::new();
        let late_min_gap = self.config.gaps.late_min_gap;
        let per_employee = shifts_by_employee(schedules);

        for (emp_id, shifts) in &per_employee {
            let name = display_name(emp_id, roster);

            // 大夜班最小间隔 (相邻连续已由 CONSECUTIVE_VIOLATION 报告, 此处只报 1..min_gap)
            let late_days: Vec<usize> = shifts
                .iter()
                .enumerate()
                .filter(|(_, (_, s))| *s == ShiftKind::LateNight)
                .map(|(i, _)| i)
                .collect();
            for pair in late_days.windows(2) {
                let gap = pair[1] - pair[0] - 1;
                if gap >= 1 && gap < late_min_gap {
                    let (d1, _) = shifts[pair[0]];
                    let (d2, _) = shifts[pair[1]];
                    violations.push(
                        Violation::new(
                            ViolationKind::SpacingViolation,
                            d2,
                            format!(
                                "{} 的大夜班间隔不足: {} 与 {} 之间仅隔{}个班 (最少{}个)",
                                name, d1, d2, gap, late_min_gap
                            ),
                        )
                        .with_shift(ShiftKind::LateNight)
                        .with_employees(vec![emp_id.clone()]),
                    );
                }
            }

            // 普通席白班不得相邻 (主任每天3人守白班, 两连由求解器封顶重罚)
            if !roster.is_anchor(emp_id) && !roster.is_chief(emp_id) {
                for pair in shifts.windows(2) {
                    let (d1, s1) = pair[0];
                    let (d2, s2) = pair[1];
                    if s1 == ShiftKind::Day && s2 == ShiftKind::Day {
                        violations.push(
                            Violation::new(
                                ViolationKind::SpacingViolation,
                                d2,
                                format!("{} 在 {} 和 {} 连续上白班", name, d1, d2),
                            )
                            .with_shift(ShiftKind::Day)
                            .with_employees(vec![emp_id.clone()]),
                        );
                    }
                }
            }
        }
        violations
    }
}

/// 按员工归集 (日期, 班次) 序列, 日期升序, 哨兵类型剔除
fn shifts_by_employee(
    schedules: &[DailySchedule],
) -> HashMap<String, Vec<(NaiveDate, ShiftKind)>> {
    let mut sorted: Vec<&DailySchedule> = schedules.iter().collect();
    sorted.sort_by_key(|s| s.date);

    let mut result: HashMap<String, Vec<(NaiveDate, ShiftKind)>> = HashMap::new();
    for schedule in sorted {
        for record in &schedule.records {
            if record.shift_kind.is_working() {
                result
                    .entry(record.employee_id.clone())
                    .or_default()
                    .push((schedule.date, record.shift_kind));
            }
        }
    }
    result
}

fn display_name(id: &str, roster: &Roster) -> String {
    roster
        .by_id(id)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn display_names(ids: &[String], roster: &Roster) -> Vec<String> {
    ids.iter().map(|id| display_name(id, roster)).collect()
}
