// ==========================================
// 三班轮值排班系统 - 核心库
// ==========================================
// 值班模式: 做一休二 (三组轮换, 每组每3天值班1天)
// 定员规则: 每个工作日 17 人 = 白班6 + 睡觉班5 + 小夜班3 + 大夜班3
// 夜班长: 序列前6人具备主任席资格, 每个夜班恰好1名
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排班求解 / 校验 / 修复建议
pub mod engine;

// 配置层 - 锚点日历与求解参数
pub mod config;

// API 层 - 请求/响应边界
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{GroupId, SeatKind, ShiftKind, ViolationKind};

// 领域实体
pub use domain::{
    AvoidanceGroup, DailySchedule, Employee, PinnedAssignment, Roster, ScheduleStatistics,
    ShiftDistribution, ShiftRecord,
};

// 引擎
pub use engine::{
    HistoryProjector, ProjectedHistory, RepairAdvisor, RepairSuggestion, RosterSolver,
    ScheduleValidator, ShiftChange, Violation, WorkCalendar,
};

// API
pub use api::{
    AdvisorRequest, AdvisorResponse, EmployeeInput, ScheduleApi, ScheduleError, ScheduleResult,
    SolveRequest, SolveResponse, ValidateRequest, ValidateResponse,
};

// 配置
pub use config::{GapRules, PenaltyWeights, ScheduleConfig, SlotQuota};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "三班轮值排班系统";
