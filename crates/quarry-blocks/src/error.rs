use crate::types::BlockId;

#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("unknown face selector `{0}`")]
    UnknownFaceSelector(String),
    #[error("block `{name}` uses id 0, which is reserved for air")]
    ReservedAirId { name: String },
    #[error("block id {0} is defined more than once")]
    DuplicateId(BlockId),
    #[error("block id {0} has no name and no `same_as` to inherit one from")]
    MissingName(BlockId),
    #[error("block id {0} has no model and no `same_as` to inherit one from")]
    MissingModel(BlockId),
    #[error("block id {id} refers to `same_as = {same_as}`, which is not defined before it")]
    UnresolvedSameAs { id: BlockId, same_as: BlockId },
    #[error("texture atlas is full ({capacity} layers), cannot add `{texture}`")]
    AtlasFull { capacity: usize, texture: String },
    #[error("reading block config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing block config: {0}")]
    Parse(#[from] toml::de::Error),
}
