//! Action routing.
//!
//! Maps the action token of a request to the kind of handler that serves it,
//! together with the parameters the action implies. Routing is a static table
//! lookup with a fallback rule, so every token resolves to something.

use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
};

use serde::Serialize;

/// The operation a request is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    Search,
    Commitdiff,
    Blobdiff,
    History,
    Log,
    Snapshot,
    Tree,
    Tag,
    Tags,
    Heads,
    Blame,
    Blob,
    Feed,
    Commit,
    Project,
    ProjectList,
    Graph,
    GraphData,
}

impl HandlerKind {
    /// Whether the handler needs the full set of discovered projects.
    #[must_use]
    pub const fn needs_project_list(self) -> bool {
        matches!(self, Self::ProjectList)
    }

    /// Whether the handler operates on a single selected project.
    #[must_use]
    pub const fn needs_project(self) -> bool {
        !self.needs_project_list()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Commitdiff => "commitdiff",
            Self::Blobdiff => "blobdiff",
            Self::History => "history",
            Self::Log => "log",
            Self::Snapshot => "snapshot",
            Self::Tree => "tree",
            Self::Tag => "tag",
            Self::Tags => "tags",
            Self::Heads => "heads",
            Self::Blame => "blame",
            Self::Blob => "blob",
            Self::Feed => "feed",
            Self::Commit => "commit",
            Self::Project => "project",
            Self::ProjectList => "project_list",
            Self::Graph => "graph",
            Self::GraphData => "graph_data",
        }
    }
}

impl Display for HandlerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syndication format of a feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    Atom,
    Rss,
}

impl Display for FeedFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Atom => "atom",
            Self::Rss => "rss",
        })
    }
}

/// Value of a parameter injected by routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Format(FeedFormat),
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Format(format) => write!(f, "{format}"),
        }
    }
}

/// Outcome of routing a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    pub kind: HandlerKind,
    pub params: BTreeMap<&'static str, ParamValue>,
}

impl Dispatch {
    const fn bare(kind: HandlerKind) -> Self {
        Self {
            kind,
            params: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<ParamValue> {
        self.params.get(name).copied()
    }

    /// Whether a boolean parameter is present and true.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.param(name) == Some(ParamValue::Flag(true))
    }
}

struct Route {
    action: &'static str,
    kind: HandlerKind,
    param: Option<(&'static str, ParamValue)>,
}

impl Route {
    const fn new(action: &'static str, kind: HandlerKind) -> Self {
        Self {
            action,
            kind,
            param: None,
        }
    }

    const fn flagged(action: &'static str, kind: HandlerKind, name: &'static str) -> Self {
        Self {
            action,
            kind,
            param: Some((name, ParamValue::Flag(true))),
        }
    }

    const fn feed(action: &'static str, format: FeedFormat) -> Self {
        Self {
            action,
            kind: HandlerKind::Feed,
            param: Some(("format", ParamValue::Format(format))),
        }
    }

    fn dispatch(&self) -> Dispatch {
        let mut dispatch = Dispatch::bare(self.kind);
        if let Some((name, value)) = self.param {
            dispatch.params.insert(name, value);
        }
        dispatch
    }
}

const ROUTES: &[Route] = &[
    Route::new("search", HandlerKind::Search),
    Route::new("commitdiff", HandlerKind::Commitdiff),
    Route::flagged("commitdiff_plain", HandlerKind::Commitdiff, "plain"),
    Route::new("blobdiff", HandlerKind::Blobdiff),
    Route::flagged("blobdiff_plain", HandlerKind::Blobdiff, "plain"),
    Route::new("history", HandlerKind::History),
    Route::flagged("shortlog", HandlerKind::Log, "short"),
    Route::new("log", HandlerKind::Log),
    Route::new("snapshot", HandlerKind::Snapshot),
    Route::new("tree", HandlerKind::Tree),
    Route::new("tag", HandlerKind::Tag),
    Route::new("tags", HandlerKind::Tags),
    Route::new("heads", HandlerKind::Heads),
    Route::new("blame", HandlerKind::Blame),
    Route::new("blob", HandlerKind::Blob),
    Route::flagged("blob_plain", HandlerKind::Blob, "plain"),
    Route::feed("atom", FeedFormat::Atom),
    Route::feed("rss", FeedFormat::Rss),
    Route::new("commit", HandlerKind::Commit),
    Route::new("summary", HandlerKind::Project),
    Route::flagged("project_index", HandlerKind::ProjectList, "txt"),
    Route::flagged("opml", HandlerKind::ProjectList, "opml"),
    Route::new("graph", HandlerKind::Graph),
    Route::new("graphdata", HandlerKind::GraphData),
];

/// Every action token with an explicit route, in table order.
pub fn actions() -> impl Iterator<Item = &'static str> {
    ROUTES.iter().map(|route| route.action)
}

/// Route an action token.
///
/// Tokens are matched exactly and case-sensitively. A token with no route
/// goes to the single project view when a project was selected, and to the
/// project list otherwise.
///
/// # Examples
///
/// ```
/// # use git_project_index::router::{HandlerKind, resolve};
/// let dispatch = resolve("shortlog", false);
/// assert_eq!(dispatch.kind, HandlerKind::Log);
/// assert!(dispatch.flag("short"));
///
/// assert_eq!(resolve("", true).kind, HandlerKind::Project);
/// ```
#[must_use]
pub fn resolve(action: &str, has_project: bool) -> Dispatch {
    ROUTES
        .iter()
        .find(|route| route.action == action)
        .map_or_else(|| fallback(has_project), Route::dispatch)
}

const fn fallback(has_project: bool) -> Dispatch {
    if has_project {
        Dispatch::bare(HandlerKind::Project)
    } else {
        Dispatch::bare(HandlerKind::ProjectList)
    }
}
