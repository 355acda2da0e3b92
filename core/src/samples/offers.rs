use super::print_offset_pages;
use crate::context::ScenarioContext;
use crate::scenario::{PartnerScenario, ScenarioError, ScenarioOutcome};

pub struct GetPagedOffers;

impl PartnerScenario for GetPagedOffers {
    fn title(&self) -> &str {
        "Get paged offers"
    }

    fn run(&self, context: &ScenarioContext) -> Result<ScenarioOutcome, ScenarioError> {
        let settings = context.settings();
        let page_size = settings.offer_page_size;
        let country = settings.country.as_str();

        let printed = print_offset_pages(context, page_size, "Offer", |offset| {
            context.operations().offers(country, offset, page_size)
        })?;
        context
            .console()
            .success(&format!("Listed {printed} offer(s) for {country}."))?;
        Ok(ScenarioOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{from_json, test_context, FakePartner};
    use serde_json::json;

    #[test]
    fn pages_stop_at_max_pages() {
        let mut partner = FakePartner::default();
        partner.offers = (0..10)
            .map(|idx| from_json(json!({ "id": format!("o-{idx}") })))
            .collect();
        let log = partner.log.clone();
        let (context, output) = test_context(partner, |config| {
            config.scenario.offer_page_size = 3;
            config.scenario.max_pages = 2;
            config.scenario.country = "DE".to_string();
        });

        GetPagedOffers.run(&context).expect("scenario runs");

        assert_eq!(log.calls(), vec!["offers(DE, 0, 3)", "offers(DE, 3, 3)"]);
        let text = output.contents();
        assert!(text.contains("Stopped after 2 page(s)"));
        assert!(text.contains("[ok] Listed 6 offer(s) for DE."));
    }
}
