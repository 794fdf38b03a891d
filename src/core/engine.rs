use crate::core::{canonical, rules, steps};
use crate::domain::model::{Explanation, OcrBlock, RecordKind};
use crate::domain::ports::{OcrProvider, RecordStore, RulesSource};
use crate::utils::currency;
use crate::utils::error::Result;

/// Deterministic pricing explanation engine.
///
/// Stateless: every call re-reads the rules bytes through the source port and
/// recomputes the explanation from scratch, so the rules hash always reflects
/// the bytes that produced the steps in the same call. Safe to share across
/// concurrent tasks.
pub struct ExplainEngine<S, R, O> {
    records: S,
    rules: R,
    ocr: O,
    rules_ref: String,
}

impl<S, R, O> ExplainEngine<S, R, O>
where
    S: RecordStore,
    R: RulesSource,
    O: OcrProvider,
{
    /// `rules_ref` identifies the active rate card at the rules source (a
    /// file path or blob reference). It is an explicit parameter, not hidden
    /// process state.
    pub fn new(records: S, rules: R, ocr: O, rules_ref: impl Into<String>) -> Self {
        Self {
            records,
            rules,
            ocr,
            rules_ref: rules_ref.into(),
        }
    }

    /// Explain the price of one record against the active rate card.
    pub async fn explain(&self, kind: RecordKind, id: &str) -> Result<Explanation> {
        tracing::debug!("explaining {}/{} against {}", kind, id, self.rules_ref);

        let card = rules::load(&self.rules, &self.rules_ref).await?;
        let record = self.records.get_record(kind, id).await?;
        let (steps, total) = steps::derive_steps(&record, &card)?;

        let canonical =
            canonical::canonical_string(&steps, total, card.rounding, &card.short_hash);
        let pricing_hash = canonical::pricing_hash(&canonical);

        // OCR is an expense-only concern; tasks get the fixed off block
        // without the provider ever being consulted.
        let ocr = match kind {
            RecordKind::Expense => OcrBlock::from(self.ocr.get_status(id).await?),
            RecordKind::Task => OcrBlock::off(),
        };

        let formatted_total = currency::format_amount(&card.currency, total, card.rounding);

        tracing::debug!(
            "explained {}/{}: total {} over {} steps (rules {}, pricing {})",
            kind,
            id,
            total,
            steps.len(),
            card.short_hash,
            pricing_hash
        );

        Ok(Explanation {
            id: record.id().to_string(),
            kind,
            currency: card.currency,
            steps,
            total,
            rules_version: card.version,
            rules_hash: card.short_hash,
            pricing_hash,
            ocr,
            formatted_total,
        })
    }
}
