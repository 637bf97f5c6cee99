// ==========================================
// 三班轮值排班系统 - 排班API
// ==========================================
// 职责: 入口校验 + 引擎编排, 三个操作: 求解 / 校验 / 修复建议
// 红线: 错误以结构化数据返回, 不跨边界抛异常
// ==========================================

use crate::api::dto::{
    AdvisorRequest, AdvisorResponse, EmployeeInput, SolveRequest, SolveResponse, ValidateRequest,
    ValidateResponse,
};
use crate::api::error::{ScheduleError, ScheduleResult};
use crate::config::ScheduleConfig;
use crate::domain::schedule::PinnedAssignment;
use crate::domain::types::ShiftKind;
use crate::domain::{AvoidanceGroup, Employee, Roster};
use crate::engine::advisor::RepairAdvisor;
use crate::engine::history::HistoryProjector;
use crate::engine::solver::RosterSolver;
use crate::engine::validator::ScheduleValidator;
use crate::engine::WorkCalendar;
use std::collections::HashMap;
use tracing::info;

// ==========================================
// ScheduleApi - 排班API入口
// ==========================================
pub struct ScheduleApi {
    config: ScheduleConfig,
}

impl ScheduleApi {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// 求解整月排班
    pub fn solve(&self, request: &SolveRequest) -> ScheduleResult<SolveResponse> {
        let (year, month) = parse_month(&request.month)?;
        let roster = self.build_roster(&request.employees, &request.avoidance_groups)?;
        validate_pins(&request.pinned, &roster)?;

        // 工作日解析 (覆盖优先)
        let calendar = WorkCalendar::new(&self.config);
        let work_days =
            calendar.resolve_month(year, month, request.group, request.first_work_day_override)?;

        // 历史投影
        let history = HistoryProjector::new().project(&request.previous_month_schedule, &roster);

        // 种子: 调用方指定则可复现, 否则现场抽取并随统计返回
        let seed = request.seed.unwrap_or_else(rand::random);

        info!(
            month = %request.month,
            group = %request.group,
            employees = roster.len(),
            work_days = work_days.len(),
            pins = request.pinned.len(),
            has_history = history.has_previous_data,
            "收到排班请求"
        );

        let outcome = RosterSolver::new(&roster, &work_days, &history, &self.config)
            .with_pins(&request.pinned)
            .solve(seed)?;

        Ok(SolveResponse {
            month: request.month.clone(),
            group: request.group,
            work_days,
            schedules: outcome.schedules,
            statistics: outcome.statistics,
        })
    }

    /// 校验整月排班
    pub fn validate(&self, request: &ValidateRequest) -> ValidateResponse {
        let roster = roster_of(&request.employees, &request.avoidance_groups, &self.config);
        let violations =
            ScheduleValidator::new(&self.config).validate_month(&request.schedules, &roster);
        ValidateResponse {
            is_valid: violations.is_empty(),
            violations,
        }
    }

    /// 针对单条冲突产出修复建议 (可能为空)
    pub fn advise(&self, request: &AdvisorRequest) -> AdvisorResponse {
        let roster = roster_of(&request.employees, &request.avoidance_groups, &self.config);
        let pinned = request
            .pinned
            .iter()
            .map(|p| (p.employee_id.clone(), p.date));
        let advisor = RepairAdvisor::new(&roster, &self.config, pinned, request.today);
        AdvisorResponse {
            suggestion: advisor.advise(&request.violation, &request.schedules),
        }
    }

    /// 构建花名册并检查定员下限
    fn build_roster(
        &self,
        employees: &[EmployeeInput],
        avoidance_groups: &[AvoidanceGroup],
    ) -> ScheduleResult<Roster> {
        let required = self.config.quota.total() as usize;
        if employees.len() < required {
            return Err(ScheduleError::RosterTooSmall {
                required,
                actual: employees.len(),
            });
        }
        Ok(roster_of(employees, avoidance_groups, &self.config))
    }
}

impl Default for ScheduleApi {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}

/// 输入员工列表 -> 花名册 (列表顺序即序列顺序)
fn roster_of(
    employees: &[EmployeeInput],
    avoidance_groups: &[AvoidanceGroup],
    config: &ScheduleConfig,
) -> Roster {
    let employees = employees
        .iter()
        .enumerate()
        .map(|(position, e)| Employee {
            id: e.id.clone(),
            name: e.name.clone(),
            position,
            is_chief: false, // 由 Roster::new 按位置派生
            avoidance_group_id: e.avoidance_group_id.clone(),
        })
        .collect();
    Roster::new(employees, avoidance_groups.to_vec(), config.chief_count)
}

/// 解析 YYYY-MM
fn parse_month(month: &str) -> ScheduleResult<(i32, u32)> {
    let parse = || -> Option<(i32, u32)> {
        let (y, m) = month.split_once('-')?;
        let year: i32 = y.parse().ok()?;
        let month: u32 = m.parse().ok()?;
        (1..=12).contains(&month).then_some((year, month))
    };
    parse().ok_or_else(|| ScheduleError::InvalidInput(format!("月份格式错误: {}", month)))
}

/// 锁定单元格入口校验
///
/// 拒绝: 首位员工被锁定到白班/睡觉班以外; 非工作班次; 同一单元格互相矛盾的锁定
fn validate_pins(pins: &[PinnedAssignment], roster: &Roster) -> ScheduleResult<()> {
    let mut seen: HashMap<(String, chrono::NaiveDate), ShiftKind> = HashMap::new();

    for pin in pins {
        if !pin.shift_kind.is_working() {
            return Err(ScheduleError::PinInvalid(format!(
                "{} {} 锁定为非工作班次 {}",
                pin.employee_id, pin.date, pin.shift_kind
            )));
        }

        if roster.is_anchor(&pin.employee_id)
            && !matches!(pin.shift_kind, ShiftKind::Day | ShiftKind::Sleep)
        {
            return Err(ScheduleError::PinInvalid(format!(
                "首位员工只能锁定白班或睡觉班, {} 被锁定为{}",
                pin.date,
                pin.shift_kind.display_name()
            )));
        }

        let key = (pin.employee_id.clone(), pin.date);
        if let Some(existing) = seen.insert(key, pin.shift_kind) {
            if existing != pin.shift_kind {
                return Err(ScheduleError::PinInvalid(format!(
                    "{} {} 存在互相矛盾的锁定: {} 与 {}",
                    pin.employee_id, pin.date, existing, pin.shift_kind
                )));
            }
        }
    }
    Ok(())
}
