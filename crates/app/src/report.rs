//! Plain-text rendering of a settlement.
use std::fmt;

use engine::{Currency, Money, Session, Settlement, UNNAMED_LABEL};

struct Amount(Currency, Money);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Amount(currency, value) = self;
        let text = if value.is_negative() {
            format!("-{}{}", currency.symbol(), value.abs())
        } else {
            format!("{}{}", currency.symbol(), value)
        };
        f.pad(&text)
    }
}

/// Cost table followed by the transfers, rendered through `Display`.
pub struct Report<'a> {
    session: &'a Session,
    settlement: &'a Settlement,
    currency: Currency,
}

pub fn render<'a>(
    session: &'a Session,
    settlement: &'a Settlement,
    currency: Currency,
) -> Report<'a> {
    Report {
        session,
        settlement,
        currency,
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let currency = self.currency;
        let name_width = self
            .settlement
            .summaries
            .iter()
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Name".len());

        writeln!(f, "Final Cost Table")?;
        writeln!(
            f,
            "{:<name_width$}  {:>12}  {:>12}  {:>12}",
            "Name", "Total Cost", "Paid", "Balance"
        )?;
        for summary in &self.settlement.summaries {
            writeln!(
                f,
                "{:<name_width$}  {:>12}  {:>12}  {:>12}",
                summary.name,
                Amount(currency, summary.total_share),
                Amount(currency, summary.total_paid),
                Amount(currency, summary.balance),
            )?;
        }

        writeln!(f)?;
        if self.settlement.transfers.is_empty() {
            return writeln!(f, "Nothing to settle.");
        }

        let session = self.session;
        let label = |id| {
            session
                .participant(id)
                .map(|p| p.label())
                .unwrap_or(UNNAMED_LABEL)
        };
        writeln!(f, "Transfers")?;
        for transfer in &self.settlement.transfers {
            writeln!(
                f,
                "{} -> {}: {}",
                label(transfer.from),
                label(transfer.to),
                Amount(currency, transfer.amount),
            )?;
        }
        Ok(())
    }
}
