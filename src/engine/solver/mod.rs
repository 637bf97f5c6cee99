// ==========================================
// 三班轮值排班系统 - 约束求解器
// ==========================================
// 流程: 决策变量 -> 目标函数 -> 硬约束 -> HiGHS 求解 -> 结果提取 -> 统计
// 红线: 单次求解原子产出整月结果; 求解受时间预算约束
// 红线: 同一输入 + 同一种子 => 同一输出 (线程数固定为1)
// ==========================================

pub mod constraints;
pub mod extract;
pub mod objective;
pub mod variables;

pub use constraints::ResolvedPin;

use crate::api::error::{ScheduleError, ScheduleResult};
use crate::config::ScheduleConfig;
use crate::domain::schedule::{DailySchedule, PinnedAssignment, ScheduleStatistics};
use crate::domain::Roster;
use crate::engine::history::ProjectedHistory;
use crate::engine::statistics::compute_statistics;
use chrono::NaiveDate;
use good_lp::{default_solver, ResolutionError, SolverModel};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, warn};

// ==========================================
// SolveOutcome - 求解结果
// ==========================================
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub schedules: Vec<DailySchedule>,
    pub statistics: ScheduleStatistics,
}

// ==========================================
// RosterSolver - 排班求解器
// ==========================================
pub struct RosterSolver<'a> {
    roster: &'a Roster,
    work_days: &'a [NaiveDate],
    history: &'a ProjectedHistory,
    config: &'a ScheduleConfig,
    pins: Vec<ResolvedPin>,
}

impl<'a> RosterSolver<'a> {
    pub fn new(
        roster: &'a Roster,
        work_days: &'a [NaiveDate],
        history: &'a ProjectedHistory,
        config: &'a ScheduleConfig,
    ) -> Self {
        Self {
            roster,
            work_days,
            history,
            config,
            pins: Vec::new(),
        }
    }

    /// 加载锁定单元格
    ///
    /// 员工或日期不在本次求解范围内的锁定记录直接忽略 (合法性校验在API入口完成)
    pub fn with_pins(mut self, pins: &[PinnedAssignment]) -> Self {
        let day_index: HashMap<NaiveDate, usize> = self
            .work_days
            .iter()
            .enumerate()
            .map(|(i, d)| (*d, i))
            .collect();

        for pin in pins {
            let (Some(employee), Some(day)) = (
                self.roster.position_of(&pin.employee_id),
                day_index.get(&pin.date).copied(),
            ) else {
                warn!(
                    employee_id = %pin.employee_id,
                    date = %pin.date,
                    "锁定单元格不在求解范围内, 已忽略"
                );
                continue;
            };
            self.pins.push(ResolvedPin {
                employee,
                day,
                shift: pin.shift_kind,
            });
        }
        self
    }

    /// 求解整月排班
    ///
    /// 无工作日时直接返回空排班, 不调用求解器
    pub fn solve(&self, seed: u64) -> ScheduleResult<SolveOutcome> {
        if self.work_days.is_empty() {
            debug!("工作日序列为空, 返回空排班");
            let statistics = compute_statistics(&[], self.roster, self.history, seed);
            return Ok(SolveOutcome {
                schedules: Vec::new(),
                statistics,
            });
        }

        let started = Instant::now();
        let n_days = self.work_days.len();
        info!(
            employees = self.roster.len(),
            work_days = n_days,
            pins = self.pins.len(),
            seed,
            "开始构建排班模型"
        );

        // 1. 决策变量
        let mut problem = good_lp::ProblemVariables::new();
        let pool = variables::VariablePool::new(&mut problem, self.roster, n_days);

        // 2. 目标函数 (辅助变量与联动约束随目标一起产出)
        let mut rng = StdRng::seed_from_u64(seed);
        let parts = objective::build_objective(
            &mut problem,
            &pool,
            self.roster,
            self.history,
            self.config,
            &mut rng,
        );

        // 3. 模型与求解参数
        let mut model = problem
            .minimise(parts.expression)
            .using(default_solver)
            .set_option("time_limit", self.config.max_time_seconds)
            .set_option("random_seed", (seed & 0x7fff_ffff) as i32)
            .set_option("threads", 1)
            .set_option("log_to_console", false);

        // 4. 硬约束 + 目标联动约束
        let hard = constraints::build_constraints(
            &pool,
            self.roster,
            self.history,
            &self.pins,
            self.work_days,
            self.config,
        );
        let hard_count = hard.len();
        for c in hard {
            model.add_constraint(c);
        }
        let link_count = parts.links.len();
        for c in parts.links {
            model.add_constraint(c);
        }

        debug!(
            hard_constraints = hard_count,
            link_constraints = link_count,
            penalty_vars = parts.penalty_vars,
            "模型构建完成, 开始求解"
        );

        // 5. 求解
        let solution = model.solve().map_err(|err| match err {
            ResolutionError::Infeasible => {
                warn!("求解器判定无可行解");
                ScheduleError::Infeasible(
                    "硬约束组合无解, 最可能的冲突源: 锁定单元格 / 避让规则 / 首位员工固定循环"
                        .to_string(),
                )
            }
            other => {
                warn!(error = %other, "求解器未在预算内给出结论");
                ScheduleError::Timeout(other.to_string())
            }
        })?;

        info!(elapsed_ms = started.elapsed().as_millis() as i64, "求解完成");

        // 6. 结果提取与统计
        let schedules = extract::extract_schedules(&solution, &pool, self.roster, self.work_days);
        debug_assert!(
            self.headcounts_hold(&schedules),
            "求解成功后定员不变式被破坏, 属于程序缺陷"
        );
        let statistics = compute_statistics(&schedules, self.roster, self.history, seed);

        Ok(SolveOutcome {
            schedules,
            statistics,
        })
    }

    /// 定员不变式自检 (仅调试构建)
    fn headcounts_hold(&self, schedules: &[DailySchedule]) -> bool {
        use crate::domain::types::ShiftKind;
        schedules.iter().all(|day| {
            ShiftKind::WORKING.iter().all(|s| {
                day.employees_on(*s).len() == self.config.quota.count(*s) as usize
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ShiftKind;
    use crate::domain::{AvoidanceGroup, Employee};

    fn make_roster() -> Roster {
        let employees = (0..17)
            .map(|i| Employee {
                id: format!("E{:02}", i),
                name: format!("员工{}", i),
                position: i,
                is_chief: false,
                avoidance_group_id: None,
            })
            .collect();
        Roster::new(employees, Vec::<AvoidanceGroup>::new(), 6)
    }

    #[test]
    fn test_empty_month_short_circuits() {
        let roster = make_roster();
        let config = ScheduleConfig::default();
        let history = ProjectedHistory::default();
        let solver = RosterSolver::new(&roster, &[], &history, &config);

        let outcome = solver.solve(1).expect("空月份应直接返回空排班");
        assert!(outcome.schedules.is_empty());
        assert_eq!(outcome.statistics.total_work_days, 0);
        assert_eq!(outcome.statistics.fairness_score, 0);
    }

    #[test]
    fn test_out_of_scope_pins_are_ignored() {
        let roster = make_roster();
        let config = ScheduleConfig::default();
        let history = ProjectedHistory::default();
        let work_days = vec![NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()];

        let pins = vec![
            PinnedAssignment {
                employee_id: "不存在".to_string(),
                date: work_days[0],
                shift_kind: ShiftKind::Day,
            },
            PinnedAssignment {
                employee_id: "E03".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
                shift_kind: ShiftKind::Day,
            },
            PinnedAssignment {
                employee_id: "E03".to_string(),
                date: work_days[0],
                shift_kind: ShiftKind::LateNight,
            },
        ];

        let solver =
            RosterSolver::new(&roster, &work_days, &history, &config).with_pins(&pins);
        assert_eq!(solver.pins.len(), 1);
        assert_eq!(
            solver.pins[0],
            ResolvedPin {
                employee: 3,
                day: 0,
                shift: ShiftKind::LateNight
            }
        );
    }
}
