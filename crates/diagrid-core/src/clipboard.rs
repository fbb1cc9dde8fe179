//! In-memory clipboard holding serialized items.

use crate::document::Item;
use crate::error::{EditorError, EditorResult};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

const PAYLOAD_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ClipboardPayload {
    version: u32,
    items: Vec<Item>,
}

/// Copied items, kept as JSON so the buffer can be handed to a host
/// clipboard and read back unchanged.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    buffer: Option<String>,
    /// Pastes since the last store, used to cascade pasted copies.
    paste_count: u32,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `items` into the buffer, replacing its contents.
    /// Storing nothing empties the clipboard.
    pub fn store(&mut self, items: &[Item]) -> EditorResult<()> {
        if items.is_empty() {
            self.clear();
            return Ok(());
        }
        let payload = ClipboardPayload {
            version: PAYLOAD_VERSION,
            items: items.to_vec(),
        };
        self.buffer = Some(serde_json::to_string(&payload)?);
        self.paste_count = 0;
        log::debug!("Copied {} items", items.len());
        Ok(())
    }

    /// Raw JSON contents, for exporting to a host clipboard.
    pub fn contents(&self) -> Option<&str> {
        self.buffer.as_deref()
    }

    /// Replace the buffer with JSON read from a host clipboard.
    ///
    /// The text is validated before it is accepted and must hold at least one
    /// item; on failure the previous contents are kept.
    pub fn set_contents(&mut self, json: impl Into<String>) -> EditorResult<()> {
        let json = json.into();
        if Self::parse(&json)?.is_empty() {
            return Err(EditorError::Clipboard("clipboard contents hold no items".into()));
        }
        self.buffer = Some(json);
        self.paste_count = 0;
        Ok(())
    }

    /// Deserialize the stored items as they were copied.
    pub fn load(&self) -> EditorResult<Vec<Item>> {
        match &self.buffer {
            Some(json) => Self::parse(json),
            None => Ok(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_none()
    }

    pub fn clear(&mut self) {
        self.buffer = None;
        self.paste_count = 0;
    }

    /// Copies of the stored items with fresh ids, shifted by `offset_step`
    /// once more than on the previous paste.
    pub fn instantiate(&mut self, offset_step: f64) -> EditorResult<Vec<Item>> {
        let items = self.load()?;
        if items.is_empty() {
            return Ok(items);
        }
        self.paste_count += 1;
        let shift = offset_step * f64::from(self.paste_count);
        let delta = Vec2::new(shift, shift);
        Ok(items
            .iter()
            .map(|item| {
                let mut copy = item.duplicate();
                copy.translate(delta);
                copy
            })
            .collect())
    }

    fn parse(json: &str) -> EditorResult<Vec<Item>> {
        let payload: ClipboardPayload = serde_json::from_str(json)
            .map_err(|e| EditorError::Clipboard(format!("unreadable clipboard contents: {e}")))?;
        if payload.version != PAYLOAD_VERSION {
            return Err(EditorError::Clipboard(format!(
                "unsupported clipboard version {}",
                payload.version
            )));
        }
        Ok(payload.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ItemKind;
    use kurbo::{Point, Rect};

    #[test]
    fn test_empty_clipboard() {
        let mut clipboard = Clipboard::new();
        assert!(clipboard.is_empty());
        assert!(clipboard.contents().is_none());
        assert!(clipboard.instantiate(10.0).unwrap().is_empty());
    }

    #[test]
    fn test_successive_pastes_cascade() {
        let item = Item::shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut clipboard = Clipboard::new();
        clipboard.store(std::slice::from_ref(&item)).unwrap();

        let first = clipboard.instantiate(10.0).unwrap();
        let second = clipboard.instantiate(10.0).unwrap();
        assert_ne!(first[0].id, item.id);
        assert_ne!(first[0].id, second[0].id);
        assert_eq!(first[0].bounds().origin(), Point::new(10.0, 10.0));
        assert_eq!(second[0].bounds().origin(), Point::new(20.0, 20.0));

        // A fresh copy starts the cascade over.
        clipboard.store(&[item]).unwrap();
        let third = clipboard.instantiate(10.0).unwrap();
        assert_eq!(third[0].bounds().origin(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_groups_get_fresh_child_ids() {
        let child = Item::line(vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)]);
        let child_id = child.id;
        let group = Item::new(ItemKind::Group { children: vec![child] });
        let mut clipboard = Clipboard::new();
        clipboard.store(&[group]).unwrap();

        let pasted = clipboard.instantiate(0.0).unwrap();
        let ItemKind::Group { children } = &pasted[0].kind else {
            panic!("expected a group");
        };
        assert_ne!(children[0].id, child_id);
    }

    #[test]
    fn test_set_contents_rejects_garbage() {
        let mut clipboard = Clipboard::new();
        clipboard
            .store(&[Item::shape(Rect::new(0.0, 0.0, 1.0, 1.0))])
            .unwrap();
        let before = clipboard.contents().map(str::to_owned);

        let err = clipboard.set_contents("not json").unwrap_err();
        assert!(matches!(err, EditorError::Clipboard(_)));
        assert_eq!(clipboard.contents().map(str::to_owned), before);

        let err = clipboard
            .set_contents(r#"{"version":99,"items":[]}"#)
            .unwrap_err();
        assert!(matches!(err, EditorError::Clipboard(_)));
    }

    #[test]
    fn test_empty_payloads_leave_clipboard_empty() {
        let mut clipboard = Clipboard::new();
        let err = clipboard
            .set_contents(r#"{"version":1,"items":[]}"#)
            .unwrap_err();
        assert!(matches!(err, EditorError::Clipboard(_)));
        assert!(clipboard.is_empty());

        clipboard
            .store(&[Item::shape(Rect::new(0.0, 0.0, 1.0, 1.0))])
            .unwrap();
        clipboard.store(&[]).unwrap();
        assert!(clipboard.is_empty());
        assert!(clipboard.contents().is_none());
    }

    #[test]
    fn test_contents_round_trip_through_host() {
        let mut source = Clipboard::new();
        source
            .store(&[Item::shape(Rect::new(0.0, 0.0, 4.0, 4.0))])
            .unwrap();
        let exported = source.contents().unwrap().to_owned();

        let mut target = Clipboard::new();
        target.set_contents(exported).unwrap();
        assert_eq!(target.load().unwrap(), source.load().unwrap());
    }
}
