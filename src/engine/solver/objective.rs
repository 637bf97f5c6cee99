// ==========================================
// 三班轮值排班系统 - 软约束与目标函数
// ==========================================
// 目标: 最小化加权惩罚之和
//   主任席连续白班 1000 >> 间隔超限 500 >> 两月公平性极差 200 >> 随机扰动 0-3
// 线性化口径:
//   惩罚布尔量只加下界联动 (最小化方向自动压为真实值)
//   极差 max/min 用辅助整数变量上下界约束逼出真实极值
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::types::ShiftKind;
use crate::domain::Roster;
use crate::engine::history::ProjectedHistory;
use crate::engine::solver::variables::VariablePool;
use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

/// 目标函数与其联动约束
///
/// 联动约束引用此处新建的辅助变量, 需在模型创建后一并加入
pub struct ObjectiveParts {
    pub expression: Expression,
    pub links: Vec<Constraint>,
    /// 惩罚变量计数 (日志与测试用)
    pub penalty_vars: usize,
}

/// 构建目标函数
pub fn build_objective(
    problem: &mut ProblemVariables,
    pool: &VariablePool,
    roster: &Roster,
    history: &ProjectedHistory,
    config: &ScheduleConfig,
    rng: &mut StdRng,
) -> ObjectiveParts {
    let mut objective = Expression::default();
    let mut links = Vec::new();
    let mut penalty_vars = 0usize;
    let n_days = pool.n_days;
    let weights = &config.weights;
    let gaps = &config.gaps;

    // ==========================================
    // 1. 主任席连续白班: 重罚 + 每月次数封顶 (首位员工有固定循环, 排除)
    // ==========================================
    // 配对变量被下界联动压到真实值, 求解器在封顶内尽量压到更少
    for e in pool.chief_rows().iter().copied().filter(|e| *e != 0) {
        let mut pairs = Expression::default();
        for i in 0..n_days.saturating_sub(1) {
            let pair = problem.add(variable().binary());
            penalty_vars += 1;
            // pair >= x_i + x_{i+1} - 1
            links.push(constraint!(
                pool.x(e, i, ShiftKind::Day) + pool.x(e, i + 1, ShiftKind::Day) - pair <= 1
            ));
            objective += weights.leader_day_consecutive * pair;
            pairs += pair;
        }
        if n_days >= 2 {
            let cap = gaps.chief_day_pair_cap as f64;
            links.push(constraint!(pairs <= cap));
        }
    }

    // ==========================================
    // 2. 大夜班最大间隔惩罚
    // ==========================================
    // 第i天上大夜班且其后 max_gap+1 个工作日内没有下一次大夜班时计1次;
    // 窗口越过月末的不计 (月末最后一次大夜班之后本无配对可言)
    for emp in roster.employees() {
        let e = emp.position;
        let max_gap = if emp.is_chief {
            gaps.late_max_gap_chief
        } else {
            gaps.late_max_gap_staff
        };
        objective += max_gap_penalty_terms(
            problem,
            pool,
            e,
            ShiftKind::LateNight,
            max_gap,
            weights.gap_violation,
            &mut links,
            &mut penalty_vars,
        );
    }

    // ==========================================
    // 3. 白班最大间隔惩罚 (首位员工除外)
    // ==========================================
    for emp in roster.employees().iter().skip(1) {
        objective += max_gap_penalty_terms(
            problem,
            pool,
            emp.position,
            ShiftKind::Day,
            gaps.day_max_gap,
            weights.gap_violation,
            &mut links,
            &mut penalty_vars,
        );
    }

    // ==========================================
    // 4. 两月累计公平性极差
    // ==========================================
    // 分两个群组分别平衡: 普通席 (序列6起) 与主任席 (序列1-5, 首位员工有固定
    // 循环不参与平衡); 统计口径为 本月决策变量 + 上月常量
    let staff: Vec<&crate::domain::Employee> =
        roster.employees().iter().filter(|e| !e.is_chief).collect();
    let chiefs_excl_anchor: Vec<&crate::domain::Employee> = roster
        .employees()
        .iter()
        .filter(|e| e.is_chief && e.position != 0)
        .collect();

    for cohort in [staff, chiefs_excl_anchor] {
        if cohort.len() < 2 {
            continue;
        }
        for s in ShiftKind::WORKING {
            let max_prev = cohort
                .iter()
                .map(|emp| history.prev_count(&emp.id, s))
                .max()
                .unwrap_or(0);
            let upper = (n_days as u32 + max_prev) as f64;

            let max_cnt = problem.add(variable().integer().min(0.0).max(upper));
            let min_cnt = problem.add(variable().integer().min(0.0).max(upper));
            penalty_vars += 2;

            for emp in &cohort {
                let prev = history.prev_count(&emp.id, s) as f64;
                let total = pool.month_count(emp.position, s) + prev;
                links.push(constraint!(max_cnt >= total.clone()));
                links.push(constraint!(min_cnt <= total));
            }

            objective += weights.fairness_spread * (max_cnt - min_cnt);
        }
    }

    // ==========================================
    // 5. 随机扰动 (打破同分最优解的对称性)
    // ==========================================
    for e in 0..pool.n_employees {
        for d in 0..n_days {
            for s in ShiftKind::WORKING {
                let coeff = rng.gen_range(0..=weights.jitter_max);
                if coeff > 0 {
                    objective += coeff as f64 * pool.x(e, d, s);
                }
            }
        }
    }

    debug!(
        penalty_vars,
        link_constraints = links.len(),
        "目标函数构建完成"
    );

    ObjectiveParts {
        expression: objective,
        links,
        penalty_vars,
    }
}

/// 单个员工单一班次的最大间隔惩罚项
///
/// 返回该员工的加权惩罚表达式, 联动约束与变量计数就地累加
#[allow(clippy::too_many_arguments)]
fn max_gap_penalty_terms(
    problem: &mut ProblemVariables,
    pool: &VariablePool,
    employee: usize,
    shift: ShiftKind,
    max_gap: usize,
    weight: f64,
    links: &mut Vec<Constraint>,
    penalty_vars: &mut usize,
) -> Expression {
    let mut terms = Expression::default();
    let n_days = pool.n_days;
    let window = max_gap + 1;

    for i in 0..n_days {
        // 只在完整窗口内计惩罚
        if i + window > n_days.saturating_sub(1) {
            break;
        }
        let window_sum: Expression = (i + 1..=i + window).map(|j| pool.x(employee, j, shift)).sum();
        let violation = problem.add(variable().binary());
        *penalty_vars += 1;
        // violation >= x_i - window_sum
        links.push(constraint!(pool.x(employee, i, shift) - violation - window_sum <= 0));
        terms += weight * violation;
    }

    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AvoidanceGroup, Employee};
    use rand::SeedableRng;

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
    fn test_objective_penalty_var_counts() {
        let roster = make_roster();
        let config = ScheduleConfig::default();
        let n_days = 10;
        let mut problem = ProblemVariables::new();
        let pool = VariablePool::new(&mut problem, &roster, n_days);
        let history = ProjectedHistory::default();
        let mut rng = StdRng::seed_from_u64(42);

        let parts = build_objective(&mut problem, &pool, &roster, &history, &config, &mut rng);

        // 主任席连续白班: 5人 × 9对 = 45
        let leader_pairs = 5 * (n_days - 1);
        // 大夜间隔: 主任6人窗口6 (i<=3, 4个); 普通11人窗口7 (i<=2, 3个)
        let late_gap = 6 * 4 + 11 * 3;
        // 白班间隔: 16人窗口4 (i<=5, 6个)
        let day_gap = 16 * 6;
        // 极差: 2群组 × 4班次 × 2变量 = 16
        let spread_vars = 16;
        assert_eq!(
            parts.penalty_vars,
            leader_pairs + late_gap + day_gap + spread_vars
        );

        // 联动约束: 惩罚布尔量各1条 + 5条主任两连封顶 + 极差变量每群组成员2条
        let spread_links = 4 * (11 * 2 + 5 * 2);
        assert_eq!(
            parts.links.len(),
            leader_pairs + 5 + late_gap + day_gap + spread_links
        );
    }

    #[test]
    fn test_short_month_disables_gap_penalties() {
        // 2个工作日时所有最大间隔窗口都越过月末, 只剩连续白班对与极差变量
        let roster = make_roster();
        let config = ScheduleConfig::default();
        let mut problem = ProblemVariables::new();
        let pool = VariablePool::new(&mut problem, &roster, 2);
        let mut rng = StdRng::seed_from_u64(1);

        let parts = build_objective(
            &mut problem,
            &pool,
            &roster,
            &ProjectedHistory::default(),
            &config,
            &mut rng,
        );
        // 主任席连续白班 5人×1对 + 极差 2群组×4班次×2
        assert_eq!(parts.penalty_vars, 5 + 16);
    }
}
