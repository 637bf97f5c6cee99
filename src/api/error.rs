// ==========================================
// 三班轮值排班系统 - API层错误类型
// ==========================================
// 职责: 定义稳定的错误种类 token, 跨边界以结构化数据返回, 不抛异常
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::GroupId;
use serde::Serialize;
use thiserror::Error;

/// 排班系统错误类型
///
/// 每个变体对应一个稳定 token (见 [`ScheduleError::kind`]), 供前端按种类处理
#[derive(Error, Debug)]
pub enum ScheduleError {
    // ===== 日历错误 =====
    #[error("该月无工作日: {month} {group}组, 请先设置首个工作日")]
    CalendarEmpty { month: String, group: GroupId },

    // ===== 花名册错误 =====
    #[error("员工人数不足: 定员需要{required}人, 实际{actual}人")]
    RosterTooSmall { required: usize, actual: usize },

    // ===== 锁定单元格错误 =====
    #[error("锁定单元格非法: {0}")]
    PinInvalid(String),

    // ===== 求解错误 =====
    #[error("无可行解: {0}")]
    Infeasible(String),

    #[error("求解超时: {0}")]
    Timeout(String),

    // ===== 通用错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScheduleError {
    /// 稳定的错误种类 token
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::CalendarEmpty { .. } => "CALENDAR_EMPTY",
            ScheduleError::RosterTooSmall { .. } => "ROSTER_TOO_SMALL",
            ScheduleError::PinInvalid(_) => "PIN_INVALID",
            ScheduleError::Infeasible(_) => "INFEASIBLE",
            ScheduleError::Timeout(_) => "TIMEOUT",
            ScheduleError::InvalidInput(_) => "INVALID_INPUT",
            ScheduleError::Other(_) => "INTERNAL",
        }
    }

    /// 序列化为边界错误负载
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error_kind: self.kind().to_string(),
            detail: self.to_string(),
        }
    }
}

/// 边界错误负载: { error_kind, detail }
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error_kind: String,
    pub detail: String,
}

/// Result 类型别名
pub type ScheduleResult<T> = Result<T, ScheduleError>;
