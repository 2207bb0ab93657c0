#![forbid(unsafe_code)]

use super::gh::{GhCli, GraphqlVar, LOOKUP_TIMEOUT, pointer};
use super::{TrackerConfig, TrackerError, TrackerSync};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, warn};

const PROJECT_ID_QUERY: &str = r#"
query($org: String!, $number: Int!) {
  organization(login: $org) {
    projectV2(number: $number) { id }
  }
}"#;

const FIELDS_QUERY: &str = r#"
query($org: String!, $number: Int!) {
  organization(login: $org) {
    projectV2(number: $number) {
      fields(first: 20) {
        nodes {
          ... on ProjectV2SingleSelectField { id name options { id name } }
        }
      }
    }
  }
}"#;

const ITEMS_QUERY: &str = r#"
query($org: String!, $number: Int!) {
  organization(login: $org) {
    projectV2(number: $number) {
      items(first: 100) {
        nodes { id content { ... on Issue { number } } }
      }
    }
  }
}"#;

const SET_OPTION_MUTATION: &str = r#"
mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $optionId: String!) {
  updateProjectV2ItemFieldValue(
    input: {
      projectId: $projectId
      itemId: $itemId
      fieldId: $fieldId
      value: { singleSelectOptionId: $optionId }
    }
  ) { projectV2Item { id } }
}"#;

/// A single-select board column and its options in board order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SelectField {
    pub(crate) id: String,
    pub(crate) options: Vec<(String, String)>,
}

impl SelectField {
    fn option_id(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(option, _)| option == name)
            .map(|(_, id)| id.as_str())
    }
}

/// Pushes single-select values to a GitHub Projects v2 board.
///
/// The project id and field layout are fetched once per instance.
pub(crate) struct GhProjectSync {
    gh: GhCli,
    org: String,
    project_number: i64,
    project_id: Option<String>,
    fields: Option<HashMap<String, SelectField>>,
}

impl GhProjectSync {
    /// Resolves credentials: `GITHUB_TOKEN`, else `gh auth token`.
    pub(crate) fn connect(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let gh = GhCli::new(config.gh_bin.clone());
        let token = match std::env::var("GITHUB_TOKEN") {
            Ok(token) if !token.trim().is_empty() => token,
            _ => gh
                .run(&["auth".to_string(), "token".to_string()], LOOKUP_TIMEOUT)
                .ok()
                .map(|out| out.trim().to_string())
                .filter(|token| !token.is_empty())
                .ok_or_else(|| {
                    TrackerError::Config(
                        "No GitHub token found. Set GITHUB_TOKEN or run 'gh auth login'"
                            .to_string(),
                    )
                })?,
        };
        Ok(Self {
            gh: gh.with_token(token),
            org: config.org.clone(),
            project_number: config.project_number,
            project_id: None,
            fields: None,
        })
    }

    fn board_vars(&self) -> [(&'static str, GraphqlVar); 2] {
        [
            ("org", GraphqlVar::Raw(self.org.clone())),
            ("number", GraphqlVar::Int(self.project_number)),
        ]
    }

    fn project_id(&mut self) -> Result<String, TrackerError> {
        if let Some(id) = &self.project_id {
            return Ok(id.clone());
        }
        let response = self.gh.graphql(PROJECT_ID_QUERY, &self.board_vars())?;
        let id = parse_project_id(&response)?;
        self.project_id = Some(id.clone());
        Ok(id)
    }

    fn field(&mut self, name: &str) -> Result<SelectField, TrackerError> {
        if self.fields.is_none() {
            let response = self.gh.graphql(FIELDS_QUERY, &self.board_vars())?;
            self.fields = Some(parse_select_fields(&response)?);
        }
        self.fields
            .as_ref()
            .and_then(|fields| fields.get(name))
            .cloned()
            .ok_or_else(|| TrackerError::UnknownField(name.to_string()))
    }

    fn item_id(&self, issue_number: i64) -> Result<Option<String>, TrackerError> {
        let response = self.gh.graphql(ITEMS_QUERY, &self.board_vars())?;
        find_item_id(&response, issue_number)
    }
}

impl TrackerSync for GhProjectSync {
    fn sync_field(
        &mut self,
        issue_number: i64,
        field: &str,
        value: &str,
    ) -> Result<bool, TrackerError> {
        let Some(item_id) = self.item_id(issue_number)? else {
            warn!(issue_number, "issue not found in project");
            return Ok(false);
        };
        let column = self.field(field)?;
        let Some(option_id) = column.option_id(value) else {
            return Err(TrackerError::InvalidOption {
                field: field.to_string(),
                value: value.to_string(),
                valid: column.options.iter().map(|(name, _)| name.clone()).collect(),
            });
        };
        let project_id = self.project_id()?;

        self.gh.graphql(
            SET_OPTION_MUTATION,
            &[
                ("projectId", GraphqlVar::Raw(project_id)),
                ("itemId", GraphqlVar::Raw(item_id)),
                ("fieldId", GraphqlVar::Raw(column.id.clone())),
                ("optionId", GraphqlVar::Raw(option_id.to_string())),
            ],
        )?;
        info!(issue_number, field, value, "updated project field");
        Ok(true)
    }
}

pub(crate) fn parse_project_id(response: &Value) -> Result<String, TrackerError> {
    pointer(response, "/data/organization/projectV2/id")?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| TrackerError::Parse("project id is not a string".to_string()))
}

/// Single-select fields by name. Nodes of other field types come back as
/// empty objects and are skipped.
pub(crate) fn parse_select_fields(
    response: &Value,
) -> Result<HashMap<String, SelectField>, TrackerError> {
    let nodes = pointer(response, "/data/organization/projectV2/fields/nodes")?
        .as_array()
        .ok_or_else(|| TrackerError::Parse("fields.nodes is not a list".to_string()))?;

    let mut fields = HashMap::new();
    for node in nodes {
        let (Some(id), Some(name)) = (
            node.get("id").and_then(Value::as_str),
            node.get("name").and_then(Value::as_str),
        ) else {
            continue;
        };
        let options = node
            .get("options")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|option| {
                        let name = option.get("name")?.as_str()?;
                        let id = option.get("id")?.as_str()?;
                        Some((name.to_string(), id.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        fields.insert(
            name.to_string(),
            SelectField {
                id: id.to_string(),
                options,
            },
        );
    }
    Ok(fields)
}

pub(crate) fn find_item_id(
    response: &Value,
    issue_number: i64,
) -> Result<Option<String>, TrackerError> {
    let nodes = pointer(response, "/data/organization/projectV2/items/nodes")?
        .as_array()
        .ok_or_else(|| TrackerError::Parse("items.nodes is not a list".to_string()))?;
    Ok(nodes
        .iter()
        .find(|node| {
            node.pointer("/content/number").and_then(Value::as_i64) == Some(issue_number)
        })
        .and_then(|node| node.get("id").and_then(Value::as_str))
        .map(str::to_string))
}
