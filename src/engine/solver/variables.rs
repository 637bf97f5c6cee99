// ==========================================
// 三班轮值排班系统 - 决策变量池
// ==========================================
// 布局: 扁平向量 + index(e,d,s) 寻址, 员工/日期用小整数索引, 热路径不做字符串哈希
// x[e,d,s]: 员工e在第d个工作日上班次s
// c[k,d,s]: 第k个主任席资格员工在第d个工作日占据夜班s的主任席
// ==========================================

use crate::domain::types::ShiftKind;
use crate::domain::Roster;
use good_lp::{variable, Expression, ProblemVariables, Variable};

/// 工作班次槽位数
const N_SHIFTS: usize = 4;
/// 夜班槽位数
const N_NIGHTS: usize = 3;

pub struct VariablePool {
    pub n_employees: usize,
    pub n_days: usize,
    /// 主任席资格员工的序列索引 (即 0..chief_count)
    chief_rows: Vec<usize>,
    x: Vec<Variable>,
    c: Vec<Variable>,
}

impl VariablePool {
    /// 为花名册×工作日创建全部二元决策变量
    pub fn new(problem: &mut ProblemVariables, roster: &Roster, n_days: usize) -> Self {
        let n_employees = roster.len();
        let chief_rows: Vec<usize> = roster.chiefs().map(|e| e.position).collect();

        let x = problem.add_vector(variable().binary(), n_employees * n_days * N_SHIFTS);
        let c = problem.add_vector(variable().binary(), chief_rows.len() * n_days * N_NIGHTS);

        Self {
            n_employees,
            n_days,
            chief_rows,
            x,
            c,
        }
    }

    fn x_index(&self, employee: usize, day: usize, shift: ShiftKind) -> usize {
        let slot = shift
            .slot_index()
            .expect("决策变量仅覆盖工作班次");
        (employee * self.n_days + day) * N_SHIFTS + slot
    }

    /// 分配变量 x[e,d,s]
    pub fn x(&self, employee: usize, day: usize, shift: ShiftKind) -> Variable {
        self.x[self.x_index(employee, day, shift)]
    }

    /// 主任席变量 c[k,d,s], k 为主任席资格序号 (0起)
    pub fn chief_seat(&self, chief_idx: usize, day: usize, night: ShiftKind) -> Variable {
        let slot = night
            .night_index()
            .expect("主任席变量仅覆盖夜班班次");
        self.c[(chief_idx * self.n_days + day) * N_NIGHTS + slot]
    }

    /// 主任席资格员工的序列索引
    pub fn chief_rows(&self) -> &[usize] {
        &self.chief_rows
    }

    /// 员工e第d天全部工作班次之和 (定员约束下恒为1)
    pub fn day_total(&self, employee: usize, day: usize) -> Expression {
        ShiftKind::WORKING
            .iter()
            .map(|s| self.x(employee, day, *s))
            .sum()
    }

    /// 员工e第d天全部夜班之和
    pub fn night_total(&self, employee: usize, day: usize) -> Expression {
        ShiftKind::NIGHT
            .iter()
            .map(|s| self.x(employee, day, *s))
            .sum()
    }

    /// 班次s在第d天全部员工之和
    pub fn shift_headcount(&self, day: usize, shift: ShiftKind) -> Expression {
        (0..self.n_employees).map(|e| self.x(e, day, shift)).sum()
    }

    /// 员工e本月班次s的总数
    pub fn month_count(&self, employee: usize, shift: ShiftKind) -> Expression {
        (0..self.n_days).map(|d| self.x(employee, d, shift)).sum()
    }
}
