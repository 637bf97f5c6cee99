// ==========================================
// 三班轮值排班系统 - 求解结果提取
// ==========================================
// 职责: 把求解器赋值还原为按日期排序的排班记录, 并分配具体席位
// 席位口径: 主任席优先落位, 其余席位按布局声明顺序分配
// ==========================================

use crate::domain::schedule::{DailySchedule, ShiftRecord};
use crate::domain::types::{SeatKind, ShiftKind};
use crate::domain::Roster;
use crate::engine::calendar::day_of_week_cn;
use crate::engine::solver::variables::VariablePool;
use chrono::NaiveDate;
use good_lp::Solution;
use std::collections::HashMap;

/// 从求解器赋值提取整月排班
pub fn extract_schedules<S: Solution>(
    solution: &S,
    pool: &VariablePool,
    roster: &Roster,
    work_days: &[NaiveDate],
) -> Vec<DailySchedule> {
    let mut schedules = Vec::with_capacity(work_days.len());

    for (d, date) in work_days.iter().enumerate() {
        // 第一遍: 按班次归集在班员工 (序列顺序)
        let mut members: HashMap<ShiftKind, Vec<usize>> = HashMap::new();
        for e in 0..pool.n_employees {
            for s in ShiftKind::WORKING {
                if solution.value(pool.x(e, d, s)) > 0.5 {
                    members.entry(s).or_default().push(e);
                }
            }
        }

        // 主任席归属
        let mut chief_of: HashMap<ShiftKind, usize> = HashMap::new();
        for (k, e) in pool.chief_rows().iter().enumerate() {
            for s in ShiftKind::NIGHT {
                if solution.value(pool.chief_seat(k, d, s)) > 0.5 {
                    chief_of.insert(s, *e);
                }
            }
        }

        // 第二遍: 分配席位生成记录
        let mut records = Vec::new();
        for s in ShiftKind::WORKING {
            let Some(shift_members) = members.get(&s) else {
                continue;
            };
            records.extend(allocate_seats(*date, s, shift_members, chief_of.get(&s), roster));
        }

        // 记录按员工序列顺序输出
        records.sort_by_key(|r| roster.position_of(&r.employee_id).unwrap_or(usize::MAX));

        schedules.push(DailySchedule {
            date: *date,
            day_of_week: day_of_week_cn(*date).to_string(),
            records,
        });
    }

    schedules
}

/// 按班次席位布局分配席位
fn allocate_seats(
    date: NaiveDate,
    shift: ShiftKind,
    members: &[usize],
    chief: Option<&usize>,
    roster: &Roster,
) -> Vec<ShiftRecord> {
    let layout = SeatKind::layout(shift);
    let mut records = Vec::with_capacity(members.len());

    // 展开席位队列: (席位, 是否主任席)
    let mut seat_queue: Vec<(SeatKind, bool)> = layout
        .iter()
        .flat_map(|(seat, count, is_chief)| std::iter::repeat((*seat, *is_chief)).take(*count))
        .collect();

    // 主任席先落位
    let mut remaining: Vec<usize> = members.to_vec();
    if let Some(chief_emp) = chief {
        if let Some(pos) = remaining.iter().position(|e| e == chief_emp) {
            let chief_seat = seat_queue
                .iter()
                .find(|(_, is_chief)| *is_chief)
                .map(|(seat, _)| *seat)
                .or_else(|| seat_queue.first().map(|(seat, _)| *seat));
            if let Some(seat) = chief_seat {
                remaining.remove(pos);
                seat_queue.retain(|(_, is_chief)| !is_chief);
                records.push(make_record(date, shift, *chief_emp, Some(seat), roster));
            }
        }
    }

    // 其余成员按序列顺序依次落位
    for (idx, e) in remaining.iter().enumerate() {
        let seat = seat_queue
            .get(idx)
            .map(|(seat, _)| *seat)
            // 超员时兜底到首个席位类型, 由校验器报告定员违规
            .or_else(|| layout.first().map(|(seat, _, _)| *seat));
        records.push(make_record(date, shift, *e, seat, roster));
    }

    records
}

fn make_record(
    date: NaiveDate,
    shift: ShiftKind,
    position: usize,
    seat: Option<SeatKind>,
    roster: &Roster,
) -> ShiftRecord {
    let employee_id = roster
        .by_position(position)
        .map(|e| e.id.clone())
        .unwrap_or_default();
    ShiftRecord {
        employee_id,
        date,
        shift_kind: shift,
        seat,
    }
}
