/// Constructors for the loan events the platform notarizes
use crate::transaction::types::{AccountId, Transaction, SYSTEM_ACCOUNT};
use serde_json::json;

/// Identifier of a loan in the surrounding application.
pub type LoanId = u64;

pub const FUNDING_EVENT: &str = "funding";
pub const REPAYMENT_EVENT: &str = "repayment";
pub const LOAN_REQUEST_EVENT: &str = "LOAN_REQUEST";

/// Principal plus simple interest, `rate_percent` given as e.g. `5.0` for 5%.
pub fn repayment_amount(principal: f64, rate_percent: f64) -> f64 {
    principal + principal * rate_percent / 100.0
}

impl Transaction {
    /// Lender pays the borrower the full loan amount.
    pub fn loan_funding(lender: AccountId, borrower: AccountId, loan_id: LoanId, amount: f64) -> Self {
        Transaction::new(lender, borrower, amount).with_data(json!({
            "type": FUNDING_EVENT,
            "loanId": loan_id,
        }))
    }

    /// Borrower pays back principal and interest to the lender.
    pub fn loan_repayment(
        borrower: AccountId,
        lender: AccountId,
        loan_id: LoanId,
        principal: f64,
        rate_percent: f64,
    ) -> Self {
        Transaction::new(borrower, lender, repayment_amount(principal, rate_percent)).with_data(json!({
            "type": REPAYMENT_EVENT,
            "loanId": loan_id,
        }))
    }

    /// Zero-value record of a loan request received over SMS.
    pub fn sms_loan_request(user: AccountId, loan_id: LoanId) -> Self {
        Transaction::new(SYSTEM_ACCOUNT, user, 0.0).with_data(json!({
            "type": LOAN_REQUEST_EVENT,
            "loanId": loan_id,
            "method": "SMS",
        }))
    }

    /// The `type` tag of a loan event payload, if any.
    pub fn event_type(&self) -> Option<&str> {
        self.data.as_ref()?.get("type")?.as_str()
    }
}
