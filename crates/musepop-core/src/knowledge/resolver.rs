//! Title -> entity -> latest quantity resolution against the knowledge APIs.

use serde_json::Value;
use tracing::{debug, trace};

use super::memo::ResolutionMemo;
use super::statements::{parse_statement, select_latest};
use crate::error::FetchError;
use crate::models::config::SourceConfig;
use crate::models::{Provenance, QuantityStatement, ResolvedQuantity};
use crate::source::{HttpSource, JsonRequest};

/// Resolves page titles to quantities. Holds no mutable state.
pub struct KnowledgeResolver<'a, S: HttpSource> {
    source: &'a S,
    config: &'a SourceConfig,
}

impl<'a, S: HttpSource> KnowledgeResolver<'a, S> {
    pub fn new(source: &'a S, config: &'a SourceConfig) -> Self {
        Self { source, config }
    }

    /// Entity id linked to a page title, e.g. `"Paris"` -> `"Q90"`.
    pub fn resolve_entity_id(&self, title: &str) -> Result<Option<String>, FetchError> {
        let request = JsonRequest::new(&self.config.wiki_api_url, self.config.lookup_timeout())
            .param("action", "query")
            .param("titles", title)
            .param("prop", "pageprops")
            .param("format", "json")
            .param("formatversion", "2");
        let body = self.source.get_json(&request)?;

        let entity_id = pages(&body)
            .filter_map(|page| page.pointer("/pageprops/wikibase_item"))
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|id| !id.is_empty())
            .map(str::to_string);

        trace!("Entity for {:?}: {:?}", title, entity_id);
        Ok(entity_id)
    }

    /// Best quantity statement of an entity.
    ///
    /// `source_key` is set to the entity id; [`resolve`](Self::resolve)
    /// replaces it with the lookup title.
    pub fn resolve_latest_quantity(
        &self,
        entity_id: &str,
    ) -> Result<Option<ResolvedQuantity>, FetchError> {
        let request =
            JsonRequest::new(&self.config.knowledge_api_url, self.config.lookup_timeout())
                .param("action", "wbgetentities")
                .param("ids", entity_id)
                .param("props", "labels|claims")
                .param("languages", "en")
                .param("format", "json")
                .bearer(self.config.knowledge_token.as_deref());
        let body = self.source.get_json(&request)?;

        let Some(entity) = body
            .get("entities")
            .and_then(|e| e.get(entity_id))
            .filter(|e| e.get("missing").is_none())
        else {
            debug!("Entity {} not returned", entity_id);
            return Ok(None);
        };

        let statements: Vec<QuantityStatement> = entity
            .get("claims")
            .and_then(|c| c.get(&self.config.quantity_property))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|claim| parse_statement(entity_id, claim, &self.config.point_in_time_qualifier))
            .collect();

        let Some(best) = select_latest(&statements) else {
            debug!(
                "No usable {} statement among {} for {}",
                self.config.quantity_property,
                statements.len(),
                entity_id
            );
            return Ok(None);
        };
        let Some(quantity) = best.quantity else {
            return Ok(None);
        };

        let label = entity
            .pointer("/labels/en/value")
            .and_then(Value::as_str)
            .filter(|l| !l.is_empty())
            .unwrap_or(entity_id)
            .to_string();

        Ok(Some(ResolvedQuantity {
            label,
            entity_id: entity_id.to_string(),
            quantity,
            as_of: best.as_of,
            source_key: entity_id.to_string(),
            provenance: Provenance::Live,
        }))
    }

    /// Both steps: title to entity, entity to quantity.
    pub fn resolve(&self, title: &str) -> Result<Option<ResolvedQuantity>, FetchError> {
        let Some(entity_id) = self.resolve_entity_id(title)? else {
            return Ok(None);
        };
        let resolved = self.resolve_latest_quantity(&entity_id)?;
        Ok(resolved.map(|r| ResolvedQuantity {
            source_key: title.to_string(),
            ..r
        }))
    }

    /// [`resolve`](Self::resolve) behind the caller's memo.
    pub fn resolve_memoized(
        &self,
        title: &str,
        memo: &mut ResolutionMemo,
    ) -> Result<Option<ResolvedQuantity>, FetchError> {
        if let Some(hit) = memo.get(title) {
            return Ok(Some(hit));
        }
        let resolved = self.resolve(title)?;
        if let Some(r) = &resolved {
            memo.record(r);
        }
        Ok(resolved)
    }
}

/// Pages of a query response, for both list (`formatversion=2`) and map layouts.
fn pages(body: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match body.pointer("/query/pages") {
        Some(Value::Array(list)) => Box::new(list.iter()),
        Some(Value::Object(map)) => Box::new(map.values()),
        _ => Box::new(std::iter::empty()),
    }
}
