// ==========================================
// 三班轮值排班系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与前端/存量数据一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 班次类型 (Shift Kind)
// ==========================================
// 工作班次: DAY / SLEEP / MINI_NIGHT / LATE_NIGHT
// 哨兵类型: VACATION / CUSTOM / NONE 仅出现在输入数据中, 不参与定员
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftKind {
    Day,       // 白班
    Sleep,     // 睡觉班
    MiniNight, // 小夜班
    LateNight, // 大夜班
    Vacation,  // 休假 (哨兵)
    Custom,    // 自定义 (哨兵)
    None,      // 无 (哨兵)
}

impl ShiftKind {
    /// 工作班次, 按决策变量槽位顺序
    pub const WORKING: [ShiftKind; 4] = [
        ShiftKind::Day,
        ShiftKind::Sleep,
        ShiftKind::MiniNight,
        ShiftKind::LateNight,
    ];

    /// 夜班班次 (需要主任席)
    pub const NIGHT: [ShiftKind; 3] = [ShiftKind::Sleep, ShiftKind::MiniNight, ShiftKind::LateNight];

    /// 是否为工作班次
    pub fn is_working(self) -> bool {
        matches!(
            self,
            ShiftKind::Day | ShiftKind::Sleep | ShiftKind::MiniNight | ShiftKind::LateNight
        )
    }

    /// 是否为夜班
    pub fn is_night(self) -> bool {
        matches!(
            self,
            ShiftKind::Sleep | ShiftKind::MiniNight | ShiftKind::LateNight
        )
    }

    /// 决策变量槽位 (仅工作班次)
    pub fn slot_index(self) -> Option<usize> {
        match self {
            ShiftKind::Day => Some(0),
            ShiftKind::Sleep => Some(1),
            ShiftKind::MiniNight => Some(2),
            ShiftKind::LateNight => Some(3),
            _ => None,
        }
    }

    /// 夜班槽位 (仅夜班班次)
    pub fn night_index(self) -> Option<usize> {
        match self {
            ShiftKind::Sleep => Some(0),
            ShiftKind::MiniNight => Some(1),
            ShiftKind::LateNight => Some(2),
            _ => None,
        }
    }

    /// 中文显示名
    pub fn display_name(self) -> &'static str {
        match self {
            ShiftKind::Day => "白班",
            ShiftKind::Sleep => "睡觉班",
            ShiftKind::MiniNight => "小夜班",
            ShiftKind::LateNight => "大夜班",
            ShiftKind::Vacation => "休假",
            ShiftKind::Custom => "自定义",
            ShiftKind::None => "无",
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftKind::Day => write!(f, "DAY"),
            ShiftKind::Sleep => write!(f, "SLEEP"),
            ShiftKind::MiniNight => write!(f, "MINI_NIGHT"),
            ShiftKind::LateNight => write!(f, "LATE_NIGHT"),
            ShiftKind::Vacation => write!(f, "VACATION"),
            ShiftKind::Custom => write!(f, "CUSTOM"),
            ShiftKind::None => write!(f, "NONE"),
        }
    }
}

// ==========================================
// 席位类型 (Seat Kind)
// ==========================================
// 班次内部的具体席位: 主任席优先分配, 其余席位按声明顺序分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatKind {
    // 白班席位
    DayRegular,
    // 睡觉班席位
    SleepChief,
    SleepNorthwest,
    SleepSoutheast,
    // 小夜班席位
    MiniNightChief,
    MiniNightRegular,
    // 大夜班席位
    LateNightChief,
    LateNightRegular,
}

impl SeatKind {
    /// 班次的席位布局: (席位, 数量, 是否主任席)
    pub fn layout(shift: ShiftKind) -> &'static [(SeatKind, usize, bool)] {
        match shift {
            ShiftKind::Day => &[(SeatKind::DayRegular, 6, false)],
            ShiftKind::Sleep => &[
                (SeatKind::SleepChief, 1, true),
                (SeatKind::SleepNorthwest, 2, false),
                (SeatKind::SleepSoutheast, 2, false),
            ],
            ShiftKind::MiniNight => &[
                (SeatKind::MiniNightChief, 1, true),
                (SeatKind::MiniNightRegular, 2, false),
            ],
            ShiftKind::LateNight => &[
                (SeatKind::LateNightChief, 1, true),
                (SeatKind::LateNightRegular, 2, false),
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for SeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatKind::DayRegular => write!(f, "DAY_REGULAR"),
            SeatKind::SleepChief => write!(f, "SLEEP_CHIEF"),
            SeatKind::SleepNorthwest => write!(f, "SLEEP_NORTHWEST"),
            SeatKind::SleepSoutheast => write!(f, "SLEEP_SOUTHEAST"),
            SeatKind::MiniNightChief => write!(f, "MINI_NIGHT_CHIEF"),
            SeatKind::MiniNightRegular => write!(f, "MINI_NIGHT_REGULAR"),
            SeatKind::LateNightChief => write!(f, "LATE_NIGHT_CHIEF"),
            SeatKind::LateNightRegular => write!(f, "LATE_NIGHT_REGULAR"),
        }
    }
}

// ==========================================
// 值班组 (Group)
// ==========================================
// 三组轮换: 锚点日 A 组值班, B 组次日, C 组再次日
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupId {
    A,
    B,
    C,
}

impl GroupId {
    /// 相对锚点组的天数偏移
    pub fn offset(self) -> i64 {
        match self {
            GroupId::A => 0,
            GroupId::B => 1,
            GroupId::C => 2,
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::A => write!(f, "A"),
            GroupId::B => write!(f, "B"),
            GroupId::C => write!(f, "C"),
        }
    }
}

// ==========================================
// 校验违规类型 (Violation Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    HeadcountMismatch,    // 当日总定员不等于 17
    SlotCountMismatch,    // 单个班次人数不符
    ChiefMissing,         // 夜班缺少主任席
    ChiefDuplicate,       // 夜班存在多个主任席
    DuplicateAssignment,  // 同一人当日重复分配
    RoleMismatch,         // 首位员工被排到白班/睡觉班以外
    AvoidanceConflict,    // 避让组成员同班
    ConsecutiveViolation, // 小夜/大夜连续, 或4个工作日内夜班超过3个
    SpacingViolation,     // 大夜班/白班最小间隔不足
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::HeadcountMismatch => write!(f, "HEADCOUNT_MISMATCH"),
            ViolationKind::SlotCountMismatch => write!(f, "SLOT_COUNT_MISMATCH"),
            ViolationKind::ChiefMissing => write!(f, "CHIEF_MISSING"),
            ViolationKind::ChiefDuplicate => write!(f, "CHIEF_DUPLICATE"),
            ViolationKind::DuplicateAssignment => write!(f, "DUPLICATE_ASSIGNMENT"),
            ViolationKind::RoleMismatch => write!(f, "ROLE_MISMATCH"),
            ViolationKind::AvoidanceConflict => write!(f, "AVOIDANCE_CONFLICT"),
            ViolationKind::ConsecutiveViolation => write!(f, "CONSECUTIVE_VIOLATION"),
            ViolationKind::SpacingViolation => write!(f, "SPACING_VIOLATION"),
        }
    }
}
