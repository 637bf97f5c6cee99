// ==========================================
// 三班轮值排班系统 - 排班统计
// ==========================================
// 职责: 每班次的 min/max/avg/std/极差, 本月与两月累计各一套
// 公平性评分 = 两月累计极差按工作班次求和, 越低越公平
// ==========================================

use crate::domain::schedule::{DailySchedule, ScheduleStatistics, ShiftDistribution};
use crate::domain::types::ShiftKind;
use crate::domain::Roster;
use crate::engine::history::ProjectedHistory;
use std::collections::HashMap;

/// 基于提取后的排班计算统计块
pub fn compute_statistics(
    schedules: &[DailySchedule],
    roster: &Roster,
    history: &ProjectedHistory,
    seed: u64,
) -> ScheduleStatistics {
    // 本月每人各班次数量
    let mut counts: HashMap<String, HashMap<ShiftKind, u32>> = roster
        .employees()
        .iter()
        .map(|e| (e.id.clone(), HashMap::new()))
        .collect();

    for schedule in schedules {
        for record in &schedule.records {
            if !record.shift_kind.is_working() {
                continue;
            }
            if let Some(per_emp) = counts.get_mut(&record.employee_id) {
                *per_emp.entry(record.shift_kind).or_insert(0) += 1;
            }
        }
    }

    // 两月累计
    let mut two_month: HashMap<String, HashMap<ShiftKind, u32>> = HashMap::new();
    for emp in roster.employees() {
        let per_emp = two_month.entry(emp.id.clone()).or_default();
        for s in ShiftKind::WORKING {
            let current = counts
                .get(&emp.id)
                .and_then(|m| m.get(&s))
                .copied()
                .unwrap_or(0);
            per_emp.insert(s, current + history.prev_count(&emp.id, s));
        }
    }

    let shift_distributions = distributions_of(&counts, roster);
    let two_month_distributions = distributions_of(&two_month, roster);

    let fairness_score = two_month_distributions.values().map(|d| d.spread).sum();

    ScheduleStatistics {
        total_work_days: schedules.len(),
        shift_distributions,
        two_month_distributions,
        employee_shift_counts: counts,
        two_month_employee_counts: two_month,
        fairness_score,
        has_previous_data: history.has_previous_data,
        seed,
    }
}

/// 全员口径的每班次分布
fn distributions_of(
    counts: &HashMap<String, HashMap<ShiftKind, u32>>,
    roster: &Roster,
) -> HashMap<ShiftKind, ShiftDistribution> {
    let mut result = HashMap::new();
    if roster.is_empty() {
        return result;
    }

    for s in ShiftKind::WORKING {
        let values: Vec<u32> = roster
            .employees()
            .iter()
            .map(|e| {
                counts
                    .get(&e.id)
                    .and_then(|m| m.get(&s))
                    .copied()
                    .unwrap_or(0)
            })
            .collect();

        let min = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);
        let avg = values.iter().sum::<u32>() as f64 / values.len() as f64;
        result.insert(
            s,
            ShiftDistribution {
                min,
                max,
                avg: round2(avg),
                std_dev: round2(sample_std_dev(&values)),
                spread: max - min,
            },
        );
    }
    result
}

/// 样本标准差 (n-1), 样本数不足2时为0
fn sample_std_dev(values: &[u32]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<u32>() as f64 / n;
    let variance = values
        .iter()
        .map(|v| {
            let diff = *v as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);
    variance.sqrt()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
