use super::status::{RuleStatus, RuleType, SortOrder};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Filter set accepted by `GET /api/v2/inferences/query`.
///
/// Every field is optional. Absent fields are left out of the query string
/// entirely; list fields become one `key=value` pair per element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryInferencesParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_types: Option<Vec<RuleType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_statuses: Option<Vec<RuleStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_statuses: Option<Vec<RuleStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_statuses: Option<Vec<RuleStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_count: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl QueryInferencesParams {
    /// Ordered `(key, value)` pairs in field declaration order, regardless
    /// of the order fields were set in. The server ignores key order; a fixed
    /// order keeps the query string usable as a cache key.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        push_list(&mut pairs, "task_ids", self.task_ids.as_deref(), Clone::clone);
        push_scalar(&mut pairs, "task_name", self.task_name.as_ref());
        push_scalar(&mut pairs, "conversation_id", self.conversation_id.as_ref());
        push_scalar(&mut pairs, "inference_id", self.inference_id.as_ref());
        push_scalar(&mut pairs, "user_id", self.user_id.as_ref());
        push_scalar(&mut pairs, "start_time", self.start_time.as_ref());
        push_scalar(&mut pairs, "end_time", self.end_time.as_ref());
        push_list(&mut pairs, "rule_types", self.rule_types.as_deref(), |t| {
            t.as_ref().to_string()
        });
        push_list(
            &mut pairs,
            "rule_statuses",
            self.rule_statuses.as_deref(),
            ToString::to_string,
        );
        push_list(
            &mut pairs,
            "prompt_statuses",
            self.prompt_statuses.as_deref(),
            ToString::to_string,
        );
        push_list(
            &mut pairs,
            "response_statuses",
            self.response_statuses.as_deref(),
            ToString::to_string,
        );
        push_scalar(&mut pairs, "include_count", self.include_count.as_ref());
        push_scalar(&mut pairs, "sort", self.sort.as_ref());
        push_scalar(&mut pairs, "page_size", self.page_size.as_ref());
        push_scalar(&mut pairs, "page", self.page.as_ref());

        pairs
    }

    /// Form-urlencoded query string without the leading `?`. Empty when no
    /// field is set.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }
}

fn push_scalar<T: ToString>(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<&T>,
) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

fn push_list<T>(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    values: Option<&[T]>,
    render: impl Fn(&T) -> String,
) {
    for value in values.unwrap_or_default() {
        pairs.push((key, render(value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_page_fields_serialize_to_two_pairs() {
        let params = QueryInferencesParams {
            page_size: Some(10),
            page: Some(0),
            ..QueryInferencesParams::default()
        };
        assert_eq!(params.to_query_string(), "page_size=10&page=0");
    }

    #[test]
    fn pagination_follows_declaration_order() {
        let params = QueryInferencesParams {
            page: Some(2),
            page_size: Some(25),
            sort: Some(SortOrder::Asc),
            include_count: Some(true),
            ..QueryInferencesParams::default()
        };
        let keys: Vec<_> = params.to_pairs().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["include_count", "sort", "page_size", "page"]);
    }

    #[test]
    fn empty_params_produce_empty_query() {
        assert_eq!(QueryInferencesParams::default().to_query_string(), "");
    }

    #[test]
    fn list_fields_repeat_in_input_order() {
        let params = QueryInferencesParams {
            task_ids: Some(vec!["t-2".into(), "t-1".into()]),
            rule_statuses: Some(vec![RuleStatus::Fail, RuleStatus::PartiallyUnavailable]),
            rule_types: Some(vec![RuleType::PiiDataRule]),
            ..QueryInferencesParams::default()
        };
        assert_eq!(
            params.to_pairs(),
            vec![
                ("task_ids", "t-2".to_string()),
                ("task_ids", "t-1".to_string()),
                ("rule_types", "PIIDataRule".to_string()),
                ("rule_statuses", "Fail".to_string()),
                ("rule_statuses", "Partially Unavailable".to_string()),
            ]
        );
        assert_eq!(
            params.to_query_string(),
            "task_ids=t-2&task_ids=t-1&rule_types=PIIDataRule\
             &rule_statuses=Fail&rule_statuses=Partially+Unavailable"
        );
    }

    #[test]
    fn empty_list_emits_nothing() {
        let params = QueryInferencesParams {
            rule_statuses: Some(Vec::new()),
            ..QueryInferencesParams::default()
        };
        assert!(params.to_pairs().is_empty());
    }

    #[test]
    fn scalars_are_stringified() {
        let params = QueryInferencesParams {
            task_name: Some("support bot".into()),
            include_count: Some(true),
            sort: Some(SortOrder::Desc),
            ..QueryInferencesParams::default()
        };
        assert_eq!(
            params.to_query_string(),
            "task_name=support+bot&include_count=true&sort=desc"
        );
    }
}
