use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines the closed set of block types together with their persisted names.
macro_rules! define_block_types {
    ( $( ($variant:ident, $name:literal) ),* $(,)? ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum BlockType {
            $( $variant, )*
        }

        impl BlockType {
            pub const ALL: &'static [BlockType] = &[ $( BlockType::$variant, )* ];

            /// The name the editor stores in a block's `type` field.
            pub fn name(&self) -> &'static str {
                match self {
                    $( BlockType::$variant => $name, )*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(BlockType::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

define_block_types! {
    (Say, "say"),
    (Gather, "gather"),
    (Forward, "forward"),
    (Record, "record"),
    (Pause, "pause"),
    (Play, "play"),
    (Hangup, "hangup"),
    (Sms, "sms"),
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Maps persisted type names onto block types.
///
/// Starts out with the built-in names and can learn aliases for editors that
/// store their own naming.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    types: AHashMap<String, BlockType>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        let types = BlockType::ALL
            .iter()
            .map(|block_type| (block_type.name().to_string(), *block_type))
            .collect();
        Self { types }
    }
}

impl BlockRegistry {
    /// Registers `user_type_name` as another name for a built-in type.
    /// Returns `false` when `builtin_type_name` is not a known type.
    pub fn register_alias(&mut self, user_type_name: &str, builtin_type_name: &str) -> bool {
        match BlockType::from_name(builtin_type_name) {
            Some(block_type) => {
                self.types.insert(user_type_name.to_string(), block_type);
                true
            }
            None => false,
        }
    }

    pub fn resolve(&self, type_name: &str) -> Option<BlockType> {
        self.types.get(type_name).copied()
    }
}
