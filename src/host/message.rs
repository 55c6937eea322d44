use serde::{Deserialize, Serialize};

/// View-model the host attaches to every rendered message node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgRecord {
    #[serde(default)]
    pub elements: Vec<MsgElement>,
    #[serde(default)]
    pub send_member_name: Option<String>,
    #[serde(default)]
    pub send_nick_name: Option<String>,
    #[serde(default)]
    pub sender_uid: Option<String>,
}

impl MsgRecord {
    /// Display name of the author: group card name first, then nickname.
    /// Empty strings count as absent.
    pub fn author_name(&self) -> Option<&str> {
        [&self.send_member_name, &self.send_nick_name]
            .into_iter()
            .filter_map(|name| name.as_deref())
            .find(|name| !name.is_empty())
    }

    pub fn has_picture(&self) -> bool {
        self.elements.iter().any(|e| e.pic_element.is_some())
    }

    pub fn market_face(&self) -> Option<&MarketFaceElement> {
        self.elements.iter().find_map(|e| e.market_face_element.as_ref())
    }

    /// The text payload when the message consists of exactly one text element.
    pub fn sole_text(&self) -> Option<&TextElement> {
        match self.elements.as_slice() {
            [only] => only.text_element.as_ref(),
            _ => None,
        }
    }
}

/// One classified piece of a message payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgElement {
    #[serde(default)]
    pub text_element: Option<TextElement>,
    #[serde(default)]
    pub pic_element: Option<PicElement>,
    #[serde(default)]
    pub market_face_element: Option<MarketFaceElement>,
}

impl MsgElement {
    pub fn text(content: &str) -> Self {
        Self {
            text_element: Some(TextElement {
                content: content.to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn picture(source_path: &str) -> Self {
        Self {
            pic_element: Some(PicElement {
                source_path: Some(source_path.to_string()),
            }),
            ..Self::default()
        }
    }

    pub fn market_face(static_face_path: &str) -> Self {
        Self {
            market_face_element: Some(MarketFaceElement {
                static_face_path: Some(static_face_path.to_string()),
            }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PicElement {
    #[serde(default)]
    pub source_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketFaceElement {
    #[serde(default)]
    pub static_face_path: Option<String>,
}
