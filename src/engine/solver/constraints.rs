// ==========================================
// 三班轮值排班系统 - 硬约束构建
// ==========================================
// 红线: 硬约束必须全部满足, 无解时向调用方返回 INFEASIBLE 而非降级
// 约束清单:
//   1 每人每天恰好一个班次         2 每班次定员 (6/5/3/3)
//   3 每个夜班恰好一个主任席       4 主任席必须在对应班次上 / 每人每天至多一个主任席
//   5 每个夜班恰好一名主任席资格员工
//   6 首位员工 1白2睡 循环 (锁定日除外)   7 首位员工禁止小夜/大夜
//   8 锁定单元格                   9 避让组同班互斥
//  10 大夜班最小间隔              11 白班最小间隔 (普通席相邻禁止, 主任席禁三连)
//  12 小夜/大夜禁止连续           13 任意4个工作日内夜班至多3个
//  14 跨月大夜班最小间隔 (对照上月最后一次大夜班)
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::types::ShiftKind;
use crate::domain::Roster;
use crate::engine::history::ProjectedHistory;
use crate::engine::solver::variables::VariablePool;
use chrono::NaiveDate;
use good_lp::{constraint, Constraint};
use std::collections::HashSet;

/// 已解析的锁定单元格 (员工/日期均换算为索引)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPin {
    pub employee: usize,
    pub day: usize,
    pub shift: ShiftKind,
}

/// 构建全部硬约束
///
/// 工作日序列不足2天时间隔类约束自然失效 (循环体为空)
pub fn build_constraints(
    pool: &VariablePool,
    roster: &Roster,
    history: &ProjectedHistory,
    pins: &[ResolvedPin],
    work_days: &[NaiveDate],
    config: &ScheduleConfig,
) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    let n_emp = pool.n_employees;
    let n_days = pool.n_days;
    let gaps = &config.gaps;

    // 1. 每人每天恰好一个班次
    for e in 0..n_emp {
        for d in 0..n_days {
            constraints.push(constraint!(pool.day_total(e, d) == 1));
        }
    }

    // 2. 每班次定员
    for d in 0..n_days {
        for s in ShiftKind::WORKING {
            let required = config.quota.count(s) as f64;
            constraints.push(constraint!(pool.shift_headcount(d, s) == required));
        }
    }

    for d in 0..n_days {
        for s in ShiftKind::NIGHT {
            // 3. 每个夜班恰好一个主任席
            let seat_sum: good_lp::Expression = (0..pool.chief_rows().len())
                .map(|k| pool.chief_seat(k, d, s))
                .sum();
            constraints.push(constraint!(seat_sum == 1));

            // 5. 每个夜班恰好一名主任席资格员工在班
            let chiefs_on: good_lp::Expression =
                pool.chief_rows().iter().map(|e| pool.x(*e, d, s)).sum();
            constraints.push(constraint!(chiefs_on == 1));
        }
    }

    // 4. 主任席必须在对应班次上; 每人每天至多占一个主任席
    for (k, e) in pool.chief_rows().iter().enumerate() {
        for d in 0..n_days {
            for s in ShiftKind::NIGHT {
                constraints.push(constraint!(pool.chief_seat(k, d, s) <= pool.x(*e, d, s)));
            }
            let seats: good_lp::Expression =
                ShiftKind::NIGHT.iter().map(|s| pool.chief_seat(k, d, *s)).sum();
            constraints.push(constraint!(seats <= 1));
        }
    }

    // 6/7. 首位员工固定循环与班次限制
    if n_emp > 0 {
        let pinned_anchor_days: HashSet<usize> = pins
            .iter()
            .filter(|p| p.employee == 0)
            .map(|p| p.day)
            .collect();

        for d in 0..n_days {
            constraints.push(constraint!(pool.x(0, d, ShiftKind::MiniNight) == 0));
            constraints.push(constraint!(pool.x(0, d, ShiftKind::LateNight) == 0));

            // 锁定日由锁定约束接管, 循环约束跳过; 相位不受锁定影响
            if !pinned_anchor_days.contains(&d) {
                let required = Roster::anchor_shift_at(d, history.anchor_phase_offset);
                constraints.push(constraint!(pool.x(0, d, required) == 1));
            }
        }
    }

    // 8. 锁定单元格
    for pin in pins {
        constraints.push(constraint!(pool.x(pin.employee, pin.day, pin.shift) == 1));
    }

    // 9. 避让组: 组内两两不得同班
    for group in roster.avoidance_groups() {
        for (id_a, id_b) in group.pairs() {
            let (Some(a), Some(b)) = (roster.position_of(&id_a), roster.position_of(&id_b)) else {
                continue;
            };
            for d in 0..n_days {
                for s in ShiftKind::WORKING {
                    constraints.push(constraint!(pool.x(a, d, s) + pool.x(b, d, s) <= 1));
                }
            }
        }
    }

    // 10. 大夜班最小间隔 (主任席与普通席一致)
    for e in 0..n_emp {
        for i in 0..n_days {
            for j in (i + 1)..=(i + gaps.late_min_gap).min(n_days.saturating_sub(1)) {
                if j > i {
                    constraints.push(constraint!(
                        pool.x(e, i, ShiftKind::LateNight) + pool.x(e, j, ShiftKind::LateNight)
                            <= 1
                    ));
                }
            }
        }
    }

    // 11. 白班最小间隔
    // 普通席: 硬约束禁止相邻白班。
    // 主任席 (首位员工除外): 每天固定有3名主任在白班, 相邻白班无法完全避免,
    // 只硬性禁止三连白班, 两连次数由目标函数的配对变量封顶并重罚。
    let chief_set: HashSet<usize> = pool.chief_rows().iter().copied().collect();
    for e in 1..n_emp {
        if chief_set.contains(&e) {
            for i in 0..n_days.saturating_sub(2) {
                let three_days: good_lp::Expression =
                    (0..3).map(|j| pool.x(e, i + j, ShiftKind::Day)).sum();
                constraints.push(constraint!(three_days <= 2));
            }
        } else {
            for i in 0..n_days {
                for j in (i + 1)..=(i + gaps.day_min_gap).min(n_days.saturating_sub(1)) {
                    if j > i {
                        constraints.push(constraint!(
                            pool.x(e, i, ShiftKind::Day) + pool.x(e, j, ShiftKind::Day) <= 1
                        ));
                    }
                }
            }
        }
    }

    // 12. 小夜/大夜禁止相邻连续 (白班/睡觉班允许连续)
    for e in 0..n_emp {
        for i in 0..n_days.saturating_sub(1) {
            for s in [ShiftKind::MiniNight, ShiftKind::LateNight] {
                constraints.push(constraint!(pool.x(e, i, s) + pool.x(e, i + 1, s) <= 1));
            }
        }
    }

    // 13. 滑动窗口夜班上限
    if n_days >= gaps.night_window_days {
        for e in 0..n_emp {
            for i in 0..=(n_days - gaps.night_window_days) {
                let window_nights: good_lp::Expression = (0..gaps.night_window_days)
                    .map(|j| pool.night_total(e, i + j))
                    .sum();
                let max = gaps.night_window_max as f64;
                constraints.push(constraint!(window_nights <= max));
            }
        }
    }

    // 14. 跨月大夜班最小间隔
    for emp in roster.employees() {
        let Some(last_late) = history.last_late_night.get(&emp.id) else {
            continue;
        };
        for (d, date) in work_days.iter().enumerate() {
            if (*date - *last_late).num_days() <= gaps.cross_month_late_gap_days {
                constraints.push(constraint!(
                    pool.x(emp.position, d, ShiftKind::LateNight) == 0
                ));
            }
        }
    }

    constraints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AvoidanceGroup, Employee};
    use good_lp::ProblemVariables;

    fn make_roster(groups: Vec<AvoidanceGroup>) -> Roster {
        let employees = (0..17)
            .map(|i| Employee {
                id: format!("E{:02}", i),
                name: format!("员工{}", i),
                position: i,
                is_chief: false,
                avoidance_group_id: None,
            })
            .collect();
        Roster::new(employees, groups, 6)
    }

    fn work_days(n: usize) -> Vec<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        (0..n)
            .map(|i| first + chrono::Duration::days(3 * i as i64))
            .collect()
    }

    #[test]
    fn test_single_day_has_no_spacing_constraints() {
        // 工作日少于2天时, 间隔/连续/窗口约束全部失效
        let roster = make_roster(Vec::new());
        let config = ScheduleConfig::default();
        let days = work_days(1);
        let mut problem = ProblemVariables::new();
        let pool = VariablePool::new(&mut problem, &roster, days.len());
        let history = ProjectedHistory::default();

        let constraints = build_constraints(&pool, &roster, &history, &[], &days, &config);

        // 每人1条 + 定员4条 + 夜班(1+1)*3条 + 主任席(3+1)*6条
        // + 首位员工 2禁 + 1循环
        let expected = 17 + 4 + 6 + 24 + 3;
        assert_eq!(constraints.len(), expected);
    }

    #[test]
    fn test_avoidance_pairs_scale_constraint_count() {
        let group = AvoidanceGroup {
            id: "G1".to_string(),
            employee_ids: vec!["E07".to_string(), "E08".to_string()],
        };
        let roster = make_roster(vec![group]);
        let config = ScheduleConfig::default();
        let days = work_days(2);
        let mut problem = ProblemVariables::new();
        let pool = VariablePool::new(&mut problem, &roster, days.len());
        let history = ProjectedHistory::default();

        let without = {
            let roster_plain = make_roster(Vec::new());
            build_constraints(&pool, &roster_plain, &history, &[], &days, &config).len()
        };
        let with = build_constraints(&pool, &roster, &history, &[], &days, &config).len();

        // 每个配对: 天数 × 4种班次
        assert_eq!(with - without, 2 * 4);
    }

    #[test]
    fn test_cross_month_late_gap_bans_early_days() {
        let roster = make_roster(Vec::new());
        let config = ScheduleConfig::default();
        let days = work_days(3); // 03-01, 03-04, 03-07
        let mut problem = ProblemVariables::new();
        let pool = VariablePool::new(&mut problem, &roster, days.len());

        let mut history = ProjectedHistory::default();
        // 上月最后一次大夜班: 02-28, 距 03-01 仅1天 -> 03-01 禁排, 03-04 起放开
        history.last_late_night.insert(
            "E09".to_string(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        );

        let baseline = build_constraints(
            &pool,
            &roster,
            &ProjectedHistory::default(),
            &[],
            &days,
            &config,
        )
        .len();
        let with_history =
            build_constraints(&pool, &roster, &history, &[], &days, &config).len();
        assert_eq!(with_history - baseline, 1);
    }

    #[test]
    fn test_pinned_anchor_day_skips_cycle_constraint() {
        let roster = make_roster(Vec::new());
        let config = ScheduleConfig::default();
        let days = work_days(2);
        let mut problem = ProblemVariables::new();
        let pool = VariablePool::new(&mut problem, &roster, days.len());
        let history = ProjectedHistory::default();

        let baseline = build_constraints(&pool, &roster, &history, &[], &days, &config).len();
        let pin = ResolvedPin {
            employee: 0,
            day: 0,
            shift: ShiftKind::Sleep,
        };
        let with_pin =
            build_constraints(&pool, &roster, &history, &[pin], &days, &config).len();

        // 锁定新增1条, 同时首日循环约束被跳过1条
        assert_eq!(with_pin, baseline);
    }
}
