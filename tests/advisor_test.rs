// ==========================================
// 局部修复建议器集成测试
// ==========================================
// 性质: 建议保持定员 / 互换两条修改互为反向 / 锁定单元格不可触碰
// ==========================================


use chrono::NaiveDate;
use shift_roster::{
    PinnedAssignment, RepairSuggestion, ScheduleApi, ShiftKind, Violation, ViolationKind,
};
use test_helpers::{advisor_request, apply_suggestion, reassign, valid_day, validate_request};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, day).unwrap()
}

/// 取指定类型的第一条违规
fn first_violation(
    api: &ScheduleApi,
    schedules: &[shift_roster::DailySchedule],
    kind: ViolationKind,
) -> Violation {
    api.validate(&validate_request(schedules.to_vec()))
        .violations
        .into_iter()
        .find(|v| v.kind == kind)
        .unwrap_or_else(|| panic!("应存在 {} 违规", kind))
}

/// 互换建议的结构性质: 同日两条修改, 班次互为反向
fn assert_swap_shape(suggestion: &RepairSuggestion) {
    assert_eq!(suggestion.changes.len(), 2);
    let (a, b) = (&suggestion.changes[0], &suggestion.changes[1]);
    assert_eq!(a.date, b.date);
    assert_eq!(a.from_shift, b.to_shift);
    assert_eq!(a.to_shift, b.from_shift);
}

/// 应用建议后不得引入班次人数违规
fn assert_no_slot_mismatch_introduced(
    api: &ScheduleApi,
    schedules: &[shift_roster::DailySchedule],
    suggestion: &RepairSuggestion,
) -> usize {
    let before = api.validate(&validate_request(schedules.to_vec())).violations;
    let after_schedules = apply_suggestion(schedules, suggestion);
    let after = api.validate(&validate_request(after_schedules)).violations;

    assert!(
        !after
            .iter()
            .any(|v| v.kind == ViolationKind::SlotCountMismatch),
        "建议引入了定员违规: {:?}",
        after
    );
    assert!(
        after.len() < before.len(),
        "建议未减少违规: {} -> {}",
        before.len(),
        after.len()
    );
    after.len()
}

#[test]
fn test_chief_missing_repair() {
    let api = ScheduleApi::default();
    let mut day = valid_day(date(1));
    // 大夜班主任E03与白班普通席E06互换 -> 大夜缺主任
    reassign(&mut day, "E03", ShiftKind::Day);
    reassign(&mut day, "E06", ShiftKind::LateNight);
    let schedules = vec![day];

    let violation = first_violation(&api, &schedules, ViolationKind::ChiefMissing);
    let response = api.advise(&advisor_request(violation, schedules.clone(), Vec::new()));
    let suggestion = response.suggestion.expect("应给出修复建议");

    assert_swap_shape(&suggestion);
    // 换入的必须是主任, 换出的必须是普通席
    let chief_leg = &suggestion.changes[0];
    assert_eq!(chief_leg.to_shift, ShiftKind::LateNight);
    let remaining = assert_no_slot_mismatch_introduced(&api, &schedules, &suggestion);
    assert_eq!(remaining, 0, "单一冲突修复后应完全合规");
}

#[test]
fn test_chief_duplicate_repair() {
    let api = ScheduleApi::default();
    let mut day = valid_day(date(1));
    // 主任E04换入小夜班, 普通席E13换出 -> 小夜班双主任
    reassign(&mut day, "E04", ShiftKind::MiniNight);
    reassign(&mut day, "E13", ShiftKind::Day);
    let schedules = vec![day];

    let violation = first_violation(&api, &schedules, ViolationKind::ChiefDuplicate);
    let response = api.advise(&advisor_request(violation, schedules.clone(), Vec::new()));
    let suggestion = response.suggestion.expect("应给出修复建议");

    assert_swap_shape(&suggestion);
    let remaining = assert_no_slot_mismatch_introduced(&api, &schedules, &suggestion);
    assert_eq!(remaining, 0);
}

#[test]
fn test_slot_count_repair_is_single_move() {
    let api = ScheduleApi::default();
    let mut day = valid_day(date(1));
    // 白班E08改到睡觉班: 睡觉班超员, 白班缺员
    reassign(&mut day, "E08", ShiftKind::Sleep);
    let schedules = vec![day];

    let violation = first_violation(&api, &schedules, ViolationKind::SlotCountMismatch);
    let response = api.advise(&advisor_request(violation, schedules.clone(), Vec::new()));
    let suggestion = response.suggestion.expect("应给出修复建议");

    // 单人移动: 从超员班次补到缺员班次
    assert_eq!(suggestion.changes.len(), 1);
    assert_eq!(suggestion.changes[0].from_shift, ShiftKind::Sleep);
    assert_eq!(suggestion.changes[0].to_shift, ShiftKind::Day);
    let remaining = assert_no_slot_mismatch_introduced(&api, &schedules, &suggestion);
    assert_eq!(remaining, 0);
}

#[test]
fn test_consecutive_night_repair() {
    let api = ScheduleApi::default();
    // 两个相邻工作日完全相同 -> E15 连续大夜
    let schedules = vec![valid_day(date(1)), valid_day(date(4))];

    let violation = api
        .validate(&validate_request(schedules.clone()))
        .violations
        .into_iter()
        .find(|v| {
            v.kind == ViolationKind::ConsecutiveViolation
                && v.shift == Some(ShiftKind::LateNight)
                && v.employee_ids == vec!["E15".to_string()]
        })
        .expect("应检出E15连续大夜");

    let response = api.advise(&advisor_request(
        violation.clone(),
        schedules.clone(),
        Vec::new(),
    ));
    let suggestion = response.suggestion.expect("应给出修复建议");

    assert_swap_shape(&suggestion);
    // 修改发生在连续的第二天
    assert!(suggestion.changes.iter().all(|c| c.date == date(4)));
    assert!(suggestion
        .changes
        .iter()
        .any(|c| c.employee_id == "E15" && c.from_shift == ShiftKind::LateNight));

    // 应用后 E15 不再连续大夜, 定员保持
    let after = apply_suggestion(&schedules, &suggestion);
    let remaining = api.validate(&validate_request(after)).violations;
    assert!(!remaining.iter().any(|v| {
        v.kind == ViolationKind::ConsecutiveViolation
            && v.employee_ids == vec!["E15".to_string()]
            && v.shift == Some(ShiftKind::LateNight)
    }));
    assert!(!remaining
        .iter()
        .any(|v| v.kind == ViolationKind::SlotCountMismatch));
}

#[test]
fn test_pinned_cells_are_never_touched() {
    let api = ScheduleApi::default();
    let mut day = valid_day(date(1));
    reassign(&mut day, "E08", ShiftKind::Sleep);
    let schedules = vec![day.clone()];

    // 锁定睡觉班全部成员 (含E08) -> 无人可移动, 不给建议
    let pinned: Vec<PinnedAssignment> = day
        .records
        .iter()
        .filter(|r| r.shift_kind == ShiftKind::Sleep)
        .map(|r| PinnedAssignment {
            employee_id: r.employee_id.clone(),
            date: r.date,
            shift_kind: r.shift_kind,
        })
        .collect();
    assert_eq!(pinned.len(), 6);

    let violation = first_violation(&api, &schedules, ViolationKind::SlotCountMismatch);
    let response = api.advise(&advisor_request(violation, schedules, pinned));
    assert!(response.suggestion.is_none(), "锁定后不得给出建议");
}

#[test]
fn test_past_cells_are_never_touched() {
    let api = ScheduleApi::default();
    let mut day = valid_day(date(1));
    reassign(&mut day, "E08", ShiftKind::Sleep);
    let schedules = vec![day];

    let violation = first_violation(&api, &schedules, ViolationKind::SlotCountMismatch);
    // today 在排班日期之后 -> 过去的单元格不可修改
    let mut request = advisor_request(violation, schedules, Vec::new());
    request.today = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
    let response = api.advise(&request);
    assert!(response.suggestion.is_none());
}

#[test]
fn test_no_suggestion_without_understaffed_partner() {
    let api = ScheduleApi::default();
    let mut day = valid_day(date(1));
    // 添加第18人到白班: 白班超员但无缺员班次
    day.records.push(shift_roster::ShiftRecord {
        employee_id: "E17".to_string(),
        date: date(1),
        shift_kind: ShiftKind::Day,
        seat: None,
    });
    let schedules = vec![day];

    let violation = first_violation(&api, &schedules, ViolationKind::SlotCountMismatch);
    let response = api.advise(&advisor_request(violation, schedules, Vec::new()));
    assert!(response.suggestion.is_none(), "无缺员班次时不得给出建议");
}
