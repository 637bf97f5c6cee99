// ==========================================
// 三班轮值排班系统 - 领域层
// ==========================================

pub mod employee;
pub mod schedule;
pub mod types;

pub use employee::{AvoidanceGroup, Employee, Roster};
pub use schedule::{
    DailySchedule, PinnedAssignment, ScheduleStatistics, ShiftDistribution, ShiftRecord,
};
