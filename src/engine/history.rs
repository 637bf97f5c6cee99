// ==========================================
// 三班轮值排班系统 - 历史投影器
// ==========================================
// 职责: 从上月排班提取跨月衔接所需的全部信息
// 输出: 首位员工循环相位 / 每人上月班次统计 / 每人最后一次大夜班日期
// 红线: 历史数据由调用方提供, 引擎不做缓存
// ==========================================

use crate::domain::schedule::DailySchedule;
use crate::domain::types::ShiftKind;
use crate::domain::Roster;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// ProjectedHistory - 历史投影结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ProjectedHistory {
    /// 首位员工 1白2睡 循环在新月首个工作日的相位 (0..3)
    ///
    /// 0: 新月从白班开始; 1: 从第一个睡觉班开始; 2: 从第二个睡觉班开始
    pub anchor_phase_offset: usize,
    /// 上月每人各工作班次数量
    pub prev_counts: HashMap<String, HashMap<ShiftKind, u32>>,
    /// 上月每人最后一次大夜班日期 (跨月最小间隔用)
    pub last_late_night: HashMap<String, NaiveDate>,
    /// 是否存在历史数据
    pub has_previous_data: bool,
}

impl ProjectedHistory {
    /// 指定员工上月某班次数量
    pub fn prev_count(&self, employee_id: &str, kind: ShiftKind) -> u32 {
        self.prev_counts
            .get(employee_id)
            .and_then(|counts| counts.get(&kind))
            .copied()
            .unwrap_or(0)
    }
}

// ==========================================
// HistoryProjector - 历史投影器
// ==========================================
pub struct HistoryProjector;

impl HistoryProjector {
    pub fn new() -> Self {
        Self
    }

    /// 投影上月排班
    ///
    /// 上月数据缺失(或缺少首位员工记录)时按"无历史"处理, 相位为 0
    pub fn project(
        &self,
        previous_schedules: &[DailySchedule],
        roster: &Roster,
    ) -> ProjectedHistory {
        if previous_schedules.is_empty() {
            return ProjectedHistory::default();
        }

        let mut sorted: Vec<&DailySchedule> = previous_schedules.iter().collect();
        sorted.sort_by_key(|s| s.date);

        let mut prev_counts: HashMap<String, HashMap<ShiftKind, u32>> = HashMap::new();
        let mut last_late_night: HashMap<String, NaiveDate> = HashMap::new();

        for schedule in &sorted {
            for record in &schedule.records {
                // 哨兵类型不计入统计
                if !record.shift_kind.is_working() {
                    continue;
                }
                *prev_counts
                    .entry(record.employee_id.clone())
                    .or_default()
                    .entry(record.shift_kind)
                    .or_insert(0) += 1;
                if record.shift_kind == ShiftKind::LateNight {
                    last_late_night.insert(record.employee_id.clone(), schedule.date);
                }
            }
        }

        let anchor_phase_offset = roster
            .anchor()
            .map(|anchor| Self::derive_anchor_phase(&sorted, &anchor.id))
            .unwrap_or(0);

        debug!(
            prev_days = sorted.len(),
            anchor_phase_offset,
            employees_with_history = prev_counts.len(),
            "历史投影完成"
        );

        ProjectedHistory {
            anchor_phase_offset,
            prev_counts,
            last_late_night,
            has_previous_data: true,
        }
    }

    /// 由上月最后两个工作日的首位员工班次推导新月相位
    ///
    /// | 最后一天 | 倒数第二天 | 相位 |
    /// |---------|-----------|------|
    /// | DAY     | —         | 1    |
    /// | SLEEP   | DAY       | 2    |
    /// | SLEEP   | SLEEP     | 0    |
    /// | 其他/无历史 | —      | 0    |
    fn derive_anchor_phase(sorted: &[&DailySchedule], anchor_id: &str) -> usize {
        let history: Vec<ShiftKind> = sorted
            .iter()
            .filter_map(|s| s.shift_of(anchor_id))
            .collect();

        match history.as_slice() {
            [] => 0,
            [only] => match only {
                ShiftKind::Day => 1,
                ShiftKind::Sleep => 2,
                _ => 0,
            },
            [.., second_last, last] => match (second_last, last) {
                (_, ShiftKind::Day) => 1,
                (ShiftKind::Day, ShiftKind::Sleep) => 2,
                (ShiftKind::Sleep, ShiftKind::Sleep) => 0,
                _ => 0,
            },
        }
    }
}

impl Default for HistoryProjector {
    fn default() -> Self {
        Self::new()
    }
}
