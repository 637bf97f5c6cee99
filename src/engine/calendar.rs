// ==========================================
// 三班轮值排班系统 - 工作日日历
// ==========================================
// 轮换规则: 做一休二, 锚点日为锚点组值班日, B组顺延1天, C组顺延2天
// 覆盖规则: 运营方可为 (月份, 组) 指定首个工作日, 此时忽略锚点公式
// ==========================================

use crate::api::error::{ScheduleError, ScheduleResult};
use crate::config::ScheduleConfig;
use crate::domain::types::GroupId;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// 星期中文名, 周一为 weekday 0
const WEEKDAY_NAMES_CN: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

/// 工作日日历
///
/// 无状态引擎, 锚点常量通过配置传入
pub struct WorkCalendar {
    anchor_date: NaiveDate,
    anchor_group: GroupId,
    cycle_length: i64,
}

impl WorkCalendar {
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            anchor_date: config.anchor_date,
            anchor_group: config.anchor_group,
            cycle_length: config.cycle_length,
        }
    }

    /// 判断某日是否为指定组的工作日
    ///
    /// 规则: (距锚点天数 - 组偏移) mod 周期 == 0
    pub fn is_work_day(&self, date: NaiveDate, group: GroupId) -> bool {
        let days_since_anchor = (date - self.anchor_date).num_days();
        let adjusted = days_since_anchor - (group.offset() - self.anchor_group.offset());
        adjusted.rem_euclid(self.cycle_length) == 0
    }

    /// 解析某月工作日序列
    ///
    /// 优先使用首个工作日覆盖; 否则按锚点公式推导。
    /// 结果为空时返回 `CALENDAR_EMPTY`
    pub fn resolve_month(
        &self,
        year: i32,
        month: u32,
        group: GroupId,
        first_work_day_override: Option<u32>,
    ) -> ScheduleResult<Vec<NaiveDate>> {
        let work_days = match first_work_day_override {
            Some(first_day) => self.work_days_from_first_day(year, month, first_day)?,
            None => self.work_days_in_month(year, month, group)?,
        };

        debug!(
            year,
            month,
            group = %group,
            work_days = work_days.len(),
            overridden = first_work_day_override.is_some(),
            "工作日解析完成"
        );

        if work_days.is_empty() {
            return Err(ScheduleError::CalendarEmpty {
                month: format!("{:04}-{:02}", year, month),
                group,
            });
        }
        Ok(work_days)
    }

    /// 按锚点公式枚举某月全部工作日
    pub fn work_days_in_month(
        &self,
        year: i32,
        month: u32,
        group: GroupId,
    ) -> ScheduleResult<Vec<NaiveDate>> {
        let days = days_in_month(year, month)?;
        let mut work_days = Vec::new();
        for day in 1..=days {
            // 月内日期必然合法
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                if self.is_work_day(date, group) {
                    work_days.push(date);
                }
            }
        }
        Ok(work_days)
    }

    /// 从首个工作日起每隔2天一个工作日, 直到月末
    pub fn work_days_from_first_day(
        &self,
        year: i32,
        month: u32,
        first_day: u32,
    ) -> ScheduleResult<Vec<NaiveDate>> {
        let days = days_in_month(year, month)?;
        if first_day < 1 || first_day > days {
            return Err(ScheduleError::InvalidInput(format!(
                "首个工作日 {} 超出 {}-{:02} 的天数范围 1-{}",
                first_day, year, month, days
            )));
        }

        let mut work_days = Vec::new();
        let mut current = first_day;
        while current <= days {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, current) {
                work_days.push(date);
            }
            current += self.cycle_length as u32;
        }
        Ok(work_days)
    }
}

/// 星期中文名
pub fn day_of_week_cn(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES_CN[date.weekday().num_days_from_monday() as usize]
}

/// 某月天数
fn days_in_month(year: i32, month: u32) -> ScheduleResult<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ScheduleError::InvalidInput(format!("非法月份: {}-{:02}", year, month)))?;
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| ScheduleError::InvalidInput(format!("非法月份: {}-{:02}", year, month)))?;
    Ok((next_month_first - first).num_days() as u32)
}
