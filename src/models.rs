use rusqlite::Row;

/// Batch marker kinds. Every movement insert hangs off one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Salary,
    Import,
    Split,
    Shutdown,
    Provision,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Salary => "salary",
            JobKind::Import => "import",
            JobKind::Split => "split",
            JobKind::Shutdown => "shutdown",
            JobKind::Provision => "provision",
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Account {
    pub name: String,
    pub kind: String,
    pub is_active: bool,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub category_group: Option<String>,
    pub sort_order: i64,
    pub provision_kind: Option<String>,
}

/// The central fact table row. Dates are ISO-8601 strings, `month` is always
/// the first of the month. Monetary columns are nullable; NULL reads as zero.
#[derive(Debug, Clone, Default)]
pub struct Movement {
    pub id: i64,
    pub date: Option<String>,
    pub description: String,
    pub income: Option<f64>,
    pub expense: Option<f64>,
    pub account: Option<String>,
    pub category: Option<String>,
    pub is_savings: bool,
    pub is_settled: bool,
    pub month: String,
    pub inserted_on: String,
    pub provision_to_pay: Option<f64>,
    pub provision_to_recover: Option<f64>,
    pub event_date: Option<String>,
    pub provider: Option<String>,
    pub is_excluded: bool,
    pub reimbursement_rate: Option<f64>,
    pub highlight: Option<String>,
    pub number: i64,
    pub reference: Option<String>,
    pub parent_id: Option<i64>,
    pub initial_expense: Option<f64>,
    pub initial_income: Option<f64>,
    pub user_label: Option<String>,
    pub job_id: i64,
    pub declared_by: Option<String>,
}

/// Column list matching `Movement::from_row`. Keep the two in sync.
pub const MOVEMENT_COLUMNS: &str = "id, date, description, income, expense, account, category, \
     is_savings, is_settled, month, inserted_on, provision_to_pay, provision_to_recover, \
     event_date, provider, is_excluded, reimbursement_rate, highlight, number, reference, \
     parent_id, initial_expense, initial_income, user_label, job_id, declared_by";

impl Movement {
    pub fn from_row(row: &Row) -> rusqlite::Result<Movement> {
        Ok(Movement {
            id: row.get(0)?,
            date: row.get(1)?,
            description: row.get(2)?,
            income: row.get(3)?,
            expense: row.get(4)?,
            account: row.get(5)?,
            category: row.get(6)?,
            is_savings: row.get(7)?,
            is_settled: row.get(8)?,
            month: row.get(9)?,
            inserted_on: row.get(10)?,
            provision_to_pay: row.get(11)?,
            provision_to_recover: row.get(12)?,
            event_date: row.get(13)?,
            provider: row.get(14)?,
            is_excluded: row.get(15)?,
            reimbursement_rate: row.get(16)?,
            highlight: row.get(17)?,
            number: row.get(18)?,
            reference: row.get(19)?,
            parent_id: row.get(20)?,
            initial_expense: row.get(21)?,
            initial_income: row.get(22)?,
            user_label: row.get(23)?,
            job_id: row.get(24)?,
            declared_by: row.get(25)?,
        })
    }

    /// Net of the row: income minus expense, NULLs counting as zero.
    pub fn balance(&self) -> f64 {
        self.income.unwrap_or(0.0) - self.expense.unwrap_or(0.0)
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub keyword: String,
    pub category: String,
    pub match_type: String,
}

/// Substring pattern grouping movements of a category into a class.
#[derive(Debug, Clone)]
pub struct Classifier {
    pub pattern: String,
    pub class: String,
}

/// One month of the `net_salaries` pivot view. Taxes carry negative values.
#[derive(Debug, Clone)]
pub struct SalarySlip {
    pub month: String,
    pub net_salary: f64,
    pub net_bonus: f64,
    pub salary_tax: f64,
    pub bonus_tax: f64,
    pub housing: f64,
    pub other: f64,
    pub total: f64,
}
