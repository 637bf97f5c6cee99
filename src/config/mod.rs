// ==========================================
// 三班轮值排班系统 - 配置层
// ==========================================
// 职责: 锚点日历常量 / 定员配额 / 间隔规则 / 惩罚权重 / 求解预算
// 所有配置可由调用方通过 JSON 覆盖, 缺省值与运行多年的排班口径一致
// ==========================================

use crate::domain::types::{GroupId, ShiftKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 每个工作日的定员配额
///
/// 定员红线: 四种班次合计必须等于 17 人
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotQuota {
    /// 白班人数
    pub day: u32,
    /// 睡觉班人数
    pub sleep: u32,
    /// 小夜班人数
    pub mini_night: u32,
    /// 大夜班人数
    pub late_night: u32,
}

impl Default for SlotQuota {
    fn default() -> Self {
        Self {
            day: 6,
            sleep: 5,
            mini_night: 3,
            late_night: 3,
        }
    }
}

impl SlotQuota {
    /// 指定班次的定员人数
    pub fn count(&self, kind: ShiftKind) -> u32 {
        match kind {
            ShiftKind::Day => self.day,
            ShiftKind::Sleep => self.sleep,
            ShiftKind::MiniNight => self.mini_night,
            ShiftKind::LateNight => self.late_night,
            _ => 0,
        }
    }

    /// 每日总定员
    pub fn total(&self) -> u32 {
        self.day + self.sleep + self.mini_night + self.late_night
    }
}

/// 班次间隔规则
///
/// 间隔按"中间隔了几个工作日"计数: 第 i 个和第 j 个工作日之间隔 j-i-1 个班
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GapRules {
    /// 大夜班最小间隔 (硬约束, 主任席与普通席一致)
    pub late_min_gap: usize,
    /// 主任席大夜班最大间隔 (软约束)
    pub late_max_gap_chief: usize,
    /// 普通席大夜班最大间隔 (软约束)
    pub late_max_gap_staff: usize,
    /// 白班最小间隔 (普通席硬约束, 首位员工除外)
    pub day_min_gap: usize,
    /// 主任席每月两连白班次数上限 (硬约束; 主任每天3人守白班, 两连无法归零)
    pub chief_day_pair_cap: usize,
    /// 白班最大间隔 (软约束, 首位员工除外)
    pub day_max_gap: usize,
    /// 夜班滑动窗口天数
    pub night_window_days: usize,
    /// 滑动窗口内夜班数上限
    pub night_window_max: usize,
    /// 跨月大夜班最小间隔 (自然日, 对照上月最后一次大夜班)
    pub cross_month_late_gap_days: i64,
}

impl Default for GapRules {
    fn default() -> Self {
        Self {
            late_min_gap: 3,
            late_max_gap_chief: 5,
            late_max_gap_staff: 6,
            day_min_gap: 1,
            chief_day_pair_cap: 3,
            day_max_gap: 3,
            night_window_days: 4,
            night_window_max: 3,
            cross_month_late_gap_days: 3,
        }
    }
}

/// 目标函数惩罚权重
///
/// 权重层级: 连续白班 1000 >> 间隔超限 500 >> 公平性 200 >> 随机扰动 0-3
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    /// 主任席连续白班惩罚
    pub leader_day_consecutive: f64,
    /// 大夜班/白班最大间隔超限惩罚
    pub gap_violation: f64,
    /// 两月累计班次极差 (公平性) 惩罚
    pub fairness_spread: f64,
    /// 随机扰动系数上限 (含), 用于打破同分最优解的对称性
    pub jitter_max: u32,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            leader_day_consecutive: 1000.0,
            gap_violation: 500.0,
            fairness_spread: 200.0,
            jitter_max: 3,
        }
    }
}

/// 排班系统配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// 锚点日期: 该日为锚点组的值班日
    pub anchor_date: NaiveDate,
    /// 锚点组
    pub anchor_group: GroupId,
    /// 轮换周期 (做一休二 = 3天)
    pub cycle_length: i64,
    /// 主任席资格人数 (序列前 N 人)
    pub chief_count: usize,
    /// 每日定员配额
    pub quota: SlotQuota,
    /// 间隔规则
    pub gaps: GapRules,
    /// 惩罚权重
    pub weights: PenaltyWeights,
    /// 求解时间预算 (秒)
    pub max_time_seconds: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            // 2024-01-01 为 A 组值班日
            anchor_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("合法的锚点日期"),
            anchor_group: GroupId::A,
            cycle_length: 3,
            chief_count: 6,
            quota: SlotQuota::default(),
            gaps: GapRules::default(),
            weights: PenaltyWeights::default(),
            max_time_seconds: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quota_totals_17() {
        let quota = SlotQuota::default();
        assert_eq!(quota.total(), 17);
        assert_eq!(quota.count(ShiftKind::Day), 6);
        assert_eq!(quota.count(ShiftKind::Sleep), 5);
        assert_eq!(quota.count(ShiftKind::MiniNight), 3);
        assert_eq!(quota.count(ShiftKind::LateNight), 3);
        // 哨兵类型不占定员
        assert_eq!(quota.count(ShiftKind::Vacation), 0);
    }

    #[test]
    fn test_config_json_roundtrip_with_partial_input() {
        // 部分字段缺省时按默认值补齐
        let cfg: ScheduleConfig =
            serde_json::from_str(r#"{"max_time_seconds": 60.0}"#).expect("配置解析失败");
        assert_eq!(cfg.max_time_seconds, 60.0);
        assert_eq!(cfg.chief_count, 6);
        assert_eq!(cfg.anchor_group, GroupId::A);
        assert_eq!(cfg.anchor_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
