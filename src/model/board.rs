use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Board as returned by `GET /boards/{id}?lists=open&cards=open`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBoard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub lists: Vec<RawList>,
    #[serde(default)]
    pub cards: Vec<RawCard>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawList {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLabel {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCard {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub id_list: String,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
}

/// The slice of a card the story agents care about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl From<&RawCard> for CardView {
    fn from(card: &RawCard) -> Self {
        Self {
            name: card.name.clone(),
            description: card.desc.clone(),
            due: card.due.clone(),
            labels: card.labels.iter().map(|l| l.name.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattedList {
    pub cards: Vec<CardView>,
}

/// Board regrouped as list name -> cards, in the order the API returned the lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattedBoard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub lists: IndexMap<String, FormattedList>,
}

impl FormattedBoard {
    pub fn cards_in(&self, list_name: &str) -> &[CardView] {
        self.lists
            .get(list_name)
            .map(|l| l.cards.as_slice())
            .unwrap_or_default()
    }

    pub fn card_count(&self) -> usize {
        self.lists.values().map(|l| l.cards.len()).sum()
    }
}
