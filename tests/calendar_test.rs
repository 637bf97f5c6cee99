// ==========================================
// 工作日日历测试
// ==========================================
// 场景: 锚点公式推导 / 组偏移 / 首个工作日覆盖 / 空月份错误
// ==========================================

use chrono::{Datelike, NaiveDate};
use shift_roster::{GroupId, ScheduleConfig, WorkCalendar};

#[test]
fn test_groups_rotate_through_cycle() {
    let config = ScheduleConfig::default();
    let cal = WorkCalendar::new(&config);

    // 任意连续三天里, 三个组各值班一天
    let start = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
    for offset in 0..3 {
        let date = start + chrono::Duration::days(offset);
        let working: Vec<GroupId> = [GroupId::A, GroupId::B, GroupId::C]
            .into_iter()
            .filter(|g| cal.is_work_day(date, *g))
            .collect();
        assert_eq!(working.len(), 1, "{} 应恰好一个组值班", date);
    }
}

#[test]
fn test_month_work_days_are_strictly_increasing() {
    let config = ScheduleConfig::default();
    let cal = WorkCalendar::new(&config);

    for group in [GroupId::A, GroupId::B, GroupId::C] {
        let days = cal.work_days_in_month(2026, 7, group).unwrap();
        assert!(!days.is_empty());
        for pair in days.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!((pair[1] - pair[0]).num_days(), 3);
        }
        assert!(days.iter().all(|d| d.month() == 7 && d.year() == 2026));
    }
}

#[test]
fn test_override_ignores_anchor_formula() {
    let config = ScheduleConfig::default();
    let cal = WorkCalendar::new(&config);

    // 覆盖首日为3号: 3,6,9,...,30 (2026-06 共30天)
    let days = cal.resolve_month(2026, 6, GroupId::B, Some(3)).unwrap();
    assert_eq!(days[0].day(), 3);
    assert_eq!(days.len(), 10);
    assert_eq!(days.last().unwrap().day(), 30);
}

#[test]
fn test_invalid_month_is_rejected() {
    let config = ScheduleConfig::default();
    let cal = WorkCalendar::new(&config);
    let err = cal.resolve_month(2026, 13, GroupId::A, None).unwrap_err();
    assert_eq!(err.kind(), "INVALID_INPUT");
}

#[test]
fn test_resolution_matches_is_work_day() {
    let config = ScheduleConfig::default();
    let cal = WorkCalendar::new(&config);
    let days = cal.work_days_in_month(2026, 2, GroupId::C).unwrap();
    for day in &days {
        assert!(cal.is_work_day(*day, GroupId::C));
        assert!(!cal.is_work_day(*day, GroupId::A));
    }
}
