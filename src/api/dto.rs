// ==========================================
// 三班轮值排班系统 - API层数据传输对象
// ==========================================
// 日期格式: YYYY-MM-DD; 月份格式: YYYY-MM; 班次 token: SCREAMING_SNAKE_CASE
// ==========================================

use crate::domain::schedule::{DailySchedule, PinnedAssignment, ScheduleStatistics};
use crate::domain::types::GroupId;
use crate::domain::AvoidanceGroup;
use crate::engine::advisor::RepairSuggestion;
use crate::engine::validator::Violation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// EmployeeInput - 员工输入
// ==========================================
// 序列顺序即列表顺序, 主任席资格由位置派生, 调用方不提供
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avoidance_group_id: Option<String>,
}

// ==========================================
// SolveRequest - 排班请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    /// 月份, YYYY-MM
    pub month: String,
    /// 值班组
    pub group: GroupId,
    /// 员工列表 (序列顺序)
    pub employees: Vec<EmployeeInput>,
    /// 避让组
    #[serde(default)]
    pub avoidance_groups: Vec<AvoidanceGroup>,
    /// 锁定单元格
    #[serde(default)]
    pub pinned: Vec<PinnedAssignment>,
    /// 上月排班 (跨月衔接与两月公平性)
    #[serde(default)]
    pub previous_month_schedule: Vec<DailySchedule>,
    /// 首个工作日覆盖 (1-31), 指定时忽略锚点公式
    #[serde(default)]
    pub first_work_day_override: Option<u32>,
    /// 随机种子, 缺省时由求解器抽取并随统计返回
    #[serde(default)]
    pub seed: Option<u64>,
}

// ==========================================
// SolveResponse - 排班响应
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    pub month: String,
    pub group: GroupId,
    pub work_days: Vec<NaiveDate>,
    pub schedules: Vec<DailySchedule>,
    pub statistics: ScheduleStatistics,
}

// ==========================================
// ValidateRequest / ValidateResponse - 校验
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub employees: Vec<EmployeeInput>,
    #[serde(default)]
    pub avoidance_groups: Vec<AvoidanceGroup>,
    pub schedules: Vec<DailySchedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
}

// ==========================================
// AdvisorRequest / AdvisorResponse - 修复建议
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorRequest {
    /// 待修复的单条冲突 (来自校验响应)
    pub violation: Violation,
    pub employees: Vec<EmployeeInput>,
    #[serde(default)]
    pub avoidance_groups: Vec<AvoidanceGroup>,
    pub schedules: Vec<DailySchedule>,
    /// 锁定单元格 (不可触碰)
    #[serde(default)]
    pub pinned: Vec<PinnedAssignment>,
    /// 今天: 早于该日期的单元格不可修改
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<RepairSuggestion>,
}
