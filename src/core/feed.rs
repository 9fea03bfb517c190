//! # Feed
//!
//! The data contract between threadline and whatever supplies posts.
//! The shapes mirror the blog API's JSON, so the bundled fixture and a
//! real response deserialize the same way.
//!
//! ```text
//! Post
//! ├── profiles: Author          // post author
//! └── comments: [CommentNode]   // top-level comments
//!                 └── replies: [CommentNode] ...
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::thread::descendant_count;

/// Fixture bundled into the binary, used when no file is configured.
const EMBEDDED_POSTS: &str = include_str!("../../assets/posts.json");

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Author {
    pub fname: String,
    #[serde(default)]
    pub lname: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Author {
    pub fn full_name(&self) -> String {
        match self.lname.as_deref() {
            Some(lname) if !lname.is_empty() => format!("{} {}", self.fname, lname),
            _ => self.fname.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Like {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub guest: Option<String>,
    #[serde(default)]
    pub comment_id: Option<Uuid>,
    #[serde(default)]
    pub post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CommentNode {
    pub id: Uuid,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub guest: Option<String>,
    pub comment: String,
    pub post_id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub likes: Vec<Like>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Author first name, then guest name, then "Anonymous".
    pub fn display_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.fname.as_str())
            .filter(|name| !name.is_empty())
            .or_else(|| self.guest.as_deref().filter(|g| !g.is_empty()))
            .unwrap_or("Anonymous")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profiles: Author,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub shares: Vec<serde_json::Value>,
    #[serde(default)]
    pub comments: Vec<CommentNode>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum FeedError {
    Io(PathBuf, std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Io(path, e) => write!(f, "cannot read feed {}: {e}", path.display()),
            FeedError::Parse(e) => write!(f, "feed parse error: {e}"),
        }
    }
}

impl std::error::Error for FeedError {}

#[derive(Debug, PartialEq)]
pub enum InsertError {
    UnknownPost(Uuid),
    UnknownParent(Uuid),
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::UnknownPost(id) => write!(f, "no post with id {id}"),
            InsertError::UnknownParent(id) => write!(f, "no comment with id {id}"),
        }
    }
}

impl std::error::Error for InsertError {}

// ============================================================================
// Sources
// ============================================================================

/// Anything that can hand over the list of posts.
pub trait FeedSource {
    fn describe(&self) -> String;
    fn load(&self) -> Result<Vec<Post>, FeedError>;
}

/// The fixture compiled into the binary.
pub struct EmbeddedFixture;

impl FeedSource for EmbeddedFixture {
    fn describe(&self) -> String {
        "embedded fixture".to_string()
    }

    fn load(&self) -> Result<Vec<Post>, FeedError> {
        parse_posts(EMBEDDED_POSTS)
    }
}

/// A JSON file on disk with the same shape as the embedded fixture.
pub struct FixtureFile(pub PathBuf);

impl FeedSource for FixtureFile {
    fn describe(&self) -> String {
        self.0.display().to_string()
    }

    fn load(&self) -> Result<Vec<Post>, FeedError> {
        let contents =
            fs::read_to_string(&self.0).map_err(|e| FeedError::Io(self.0.clone(), e))?;
        parse_posts(&contents)
    }
}

/// Pick the source for an optional fixture path.
pub fn source_for(path: Option<&Path>) -> Box<dyn FeedSource> {
    match path {
        Some(p) => Box::new(FixtureFile(p.to_path_buf())),
        None => Box::new(EmbeddedFixture),
    }
}

pub fn parse_posts(json: &str) -> Result<Vec<Post>, FeedError> {
    serde_json::from_str(json).map_err(FeedError::Parse)
}

/// Load posts and log (but never reject) integrity problems.
pub fn load_feed(source: &dyn FeedSource) -> Result<Vec<Post>, FeedError> {
    let posts = source.load()?;
    for problem in check_integrity(&posts) {
        warn!("Feed integrity: {}", problem);
    }
    let total_comments: usize = posts
        .iter()
        .flat_map(|p| &p.comments)
        .map(|c| 1 + descendant_count(c))
        .sum();
    info!(
        "Loaded {} posts ({} comments) from {}",
        posts.len(),
        total_comments,
        source.describe()
    );
    Ok(posts)
}

// ============================================================================
// Tree queries
// ============================================================================

/// Mismatched parent/post links and duplicate ids, as human-readable lines.
pub fn check_integrity(posts: &[Post]) -> Vec<String> {
    fn walk(
        node: &CommentNode,
        post_id: Uuid,
        parent: Option<Uuid>,
        seen: &mut HashSet<Uuid>,
        out: &mut Vec<String>,
    ) {
        if !seen.insert(node.id) {
            out.push(format!("duplicate id {}", node.id));
        }
        if node.post_id != post_id {
            out.push(format!(
                "comment {} claims post {} but lives under {}",
                node.id, node.post_id, post_id
            ));
        }
        if node.parent_id != parent {
            out.push(format!(
                "comment {} has parent_id {:?}, expected {:?}",
                node.id, node.parent_id, parent
            ));
        }
        for reply in &node.replies {
            walk(reply, post_id, Some(node.id), seen, out);
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for post in posts {
        if !seen.insert(post.id) {
            out.push(format!("duplicate id {}", post.id));
        }
        for comment in &post.comments {
            walk(comment, post.id, None, &mut seen, &mut out);
        }
    }
    out
}

fn find_in<'a>(nodes: &'a [CommentNode], id: Uuid) -> Option<&'a CommentNode> {
    nodes
        .iter()
        .find_map(|n| if n.id == id { Some(n) } else { find_in(&n.replies, id) })
}

fn find_in_mut(nodes: &mut [CommentNode], id: Uuid) -> Option<&mut CommentNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(&mut node.replies, id) {
            return Some(found);
        }
    }
    None
}

/// Depth-first lookup of a comment anywhere in the feed.
pub fn find_comment(posts: &[Post], id: Uuid) -> Option<&CommentNode> {
    posts.iter().find_map(|p| find_in(&p.comments, id))
}

/// Append `node` as the last reply of its parent, or as the last
/// top-level comment of its post when it has no parent.
pub fn insert_reply(posts: &mut [Post], node: CommentNode) -> Result<(), InsertError> {
    let post = posts
        .iter_mut()
        .find(|p| p.id == node.post_id)
        .ok_or(InsertError::UnknownPost(node.post_id))?;

    match node.parent_id {
        None => post.comments.push(node),
        Some(parent_id) => {
            let parent = find_in_mut(&mut post.comments, parent_id)
                .ok_or(InsertError::UnknownParent(parent_id))?;
            parent.replies.push(node);
        }
    }
    Ok(())
}
