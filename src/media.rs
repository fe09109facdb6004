//! Gallery media items.
//!
//! A client record lists images and videos separately; galleries show them
//! as one circular sequence. [`unify`] builds that sequence: images first,
//! then videos, each in source order, with `sequence_index` running
//! `0..N` without gaps.

use serde::{Deserialize, Serialize};

/// A video reference as it appears in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VideoRef {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// One slide of a gallery. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    pub sequence_index: usize,
}

impl MediaItem {
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}

/// Build the unified slide sequence for one gallery.
pub fn unify(images: &[String], videos: &[VideoRef]) -> Vec<MediaItem> {
    let images = images.iter().map(|src| (MediaKind::Image, src, None));
    let videos = videos
        .iter()
        .map(|v| (MediaKind::Video, &v.src, v.poster.clone()));

    images
        .chain(videos)
        .enumerate()
        .map(|(sequence_index, (kind, src, poster_url))| MediaItem {
            kind,
            source_url: src.clone(),
            poster_url,
            sequence_index,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn images_come_before_videos() {
        let videos = vec![VideoRef {
            src: "/v/one.mp4".into(),
            poster: Some("/v/one.jpg".into()),
        }];
        let items = unify(&strings(&["/a.jpg", "/b.jpg"]), &videos);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].kind, MediaKind::Image);
        assert_eq!(items[1].kind, MediaKind::Image);
        assert_eq!(items[2].kind, MediaKind::Video);
        assert_eq!(items[2].source_url, "/v/one.mp4");
        assert_eq!(items[2].poster_url.as_deref(), Some("/v/one.jpg"));
    }

    #[test]
    fn sequence_indices_are_contiguous() {
        let videos = vec![
            VideoRef {
                src: "/x.mp4".into(),
                poster: None,
            },
            VideoRef {
                src: "/y.mp4".into(),
                poster: None,
            },
        ];
        let items = unify(&strings(&["/1.jpg", "/2.jpg", "/3.jpg"]), &videos);
        let indices: Vec<usize> = items.iter().map(|i| i.sequence_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn images_never_carry_posters() {
        let items = unify(&strings(&["/1.jpg"]), &[]);
        assert_eq!(items[0].poster_url, None);
        assert!(!items[0].is_video());
    }

    #[test]
    fn videos_only_gallery() {
        let videos = vec![VideoRef {
            src: "/only.mp4".into(),
            poster: None,
        }];
        let items = unify(&[], &videos);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].sequence_index, 0);
        assert!(items[0].is_video());
    }

    #[test]
    fn empty_inputs_give_empty_gallery() {
        assert!(unify(&[], &[]).is_empty());
    }
}
