use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::Provider;
use crate::config::TrelloConfig;
use crate::error::{Error, Result};
use crate::model::board::{CardView, FormattedBoard, FormattedList, RawBoard, RawCard, RawList};

const MISSING_CREDENTIALS: &str =
    "Missing Trello credentials (set TRELLO_API_KEY and TRELLO_TOKEN)";

const CARD_FIELDS: &str = "name,desc,due,idList,labels";
const LIST_FIELDS: &str = "name,pos";

pub struct TrelloProvider {
    api_key: Option<String>,
    token: Option<String>,
    board_id: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl TrelloProvider {
    pub fn new(config: &TrelloConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_key: non_empty(config.api_key.as_deref()),
            token: non_empty(config.token.as_deref()),
            board_id: non_empty(config.board_id.as_deref()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn auth_params(&self) -> Result<[(&str, &str); 2]> {
        match (self.api_key.as_deref(), self.token.as_deref()) {
            (Some(key), Some(token)) => Ok([("key", key), ("token", token)]),
            _ => Err(Error::config(MISSING_CREDENTIALS)),
        }
    }

    fn resolve_board<'a>(&'a self, board_id: Option<&'a str>) -> Result<&'a str> {
        board_id
            .filter(|id| !id.trim().is_empty())
            .or(self.board_id.as_deref())
            .ok_or_else(|| {
                Error::config("No board ID provided (set TRELLO_BOARD_ID or pass --board)")
            })
    }

    /// Authenticated GET against `{base_url}{path}`. Any non-2xx status is an error.
    pub async fn make_request(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<reqwest::Response> {
        let auth = self.auth_params()?;
        let url = format!("{}{path}", self.base_url);

        debug!(%path, "Trello request");
        let resp = self
            .client
            .get(&url)
            .query(&auth)
            .query(params)
            .send()
            .await?;
        debug!(%path, status = resp.status().as_u16(), "Trello response");

        Ok(resp.error_for_status()?)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[async_trait]
impl Provider for TrelloProvider {
    fn name(&self) -> &str {
        "Trello"
    }

    async fn validate_credentials(&self) -> Result<bool> {
        let resp = self.make_request("/members/me", &[]).await?;
        Ok(resp.status() == reqwest::StatusCode::OK)
    }

    async fn get_board_contents(&self, board_id: Option<&str>) -> Result<RawBoard> {
        let board_id = self.resolve_board(board_id)?;
        let board = self
            .make_request(
                &format!("/boards/{board_id}"),
                &[
                    ("fields", "name,desc,url"),
                    ("lists", "open"),
                    ("list_fields", LIST_FIELDS),
                    ("cards", "open"),
                    ("card_fields", CARD_FIELDS),
                ],
            )
            .await?
            .json()
            .await?;
        Ok(board)
    }

    async fn get_lists(&self, board_id: Option<&str>) -> Result<Vec<RawList>> {
        let board_id = self.resolve_board(board_id)?;
        let lists = self
            .make_request(
                &format!("/boards/{board_id}/lists"),
                &[("filter", "open"), ("fields", LIST_FIELDS)],
            )
            .await?
            .json()
            .await?;
        Ok(lists)
    }

    async fn get_cards_in_list(&self, list_id: Option<&str>) -> Result<Vec<RawCard>> {
        let list_id = list_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::config("List ID is required"))?;
        let cards = self
            .make_request(
                &format!("/lists/{list_id}/cards"),
                &[("filter", "open"), ("fields", CARD_FIELDS)],
            )
            .await?
            .json()
            .await?;
        Ok(cards)
    }
}

/// Group a board's cards under their list names.
///
/// Lists keep the API order. Two lists with the same name collapse into one
/// entry holding the later list's cards, and cards pointing at a list that
/// wasn't fetched are dropped.
pub fn format_board_contents(raw: &RawBoard) -> FormattedBoard {
    let mut by_list: HashMap<&str, Vec<CardView>> = HashMap::new();
    for card in &raw.cards {
        by_list
            .entry(card.id_list.as_str())
            .or_default()
            .push(CardView::from(card));
    }

    let mut lists: IndexMap<String, FormattedList> = IndexMap::new();
    for list in &raw.lists {
        let cards = by_list.get(list.id.as_str()).cloned().unwrap_or_default();
        lists.insert(list.name.clone(), FormattedList { cards });
    }

    FormattedBoard {
        name: raw.name.clone(),
        description: raw.desc.clone(),
        url: raw.url.clone(),
        lists,
    }
}
