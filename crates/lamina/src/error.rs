use lamina_graph::EdgeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] lamina_graph::Error),

    #[error("edge {edge} has {found} port(s); two are required")]
    DegenerateEdge { edge: EdgeId, found: usize },

    #[error("edge {edge} connects {found} ports; hyperedges are not supported")]
    HyperEdge { edge: EdgeId, found: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("invalid configuration JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),
}
