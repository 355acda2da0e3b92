use super::print_offset_pages;
use crate::context::ScenarioContext;
use crate::scenario::{PartnerScenario, ScenarioError, ScenarioOutcome};

pub struct GetAccountBalance;

impl PartnerScenario for GetAccountBalance {
    fn title(&self) -> &str {
        "Get account balance"
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let console = context.console();
        console.start_progress("Getting account balance")?;
        let balance = context.operations().account_balance()?;
        console.stop_progress()?;

        console.write_object(&balance, Some("Account balance"))?;
        Ok(ScenarioOutcome::Completed)
    }
}

pub struct GetPagedInvoices;

impl PartnerScenario for GetPagedInvoices {
    fn title(&self) -> &str {
        "Get paged invoices"
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let page_size = context.settings().invoice_page_size;
        let printed = print_offset_pages(context, page_size, "Invoice", |offset| {
            context.operations().invoices(offset, page_size)
        })?;
        context
            .console()
            .success(&format!("Listed {printed} invoice(s)."))?;
        Ok(ScenarioOutcome::Completed)
    }
}
