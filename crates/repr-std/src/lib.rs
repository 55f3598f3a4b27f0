//! repr Std
//!
//! Handlers for the built-in value kinds. The table is plain data: user
//! profiles put overlays on top of it to override any entry.
//!
//! | kind | full form | short form |
//! |------|-----------|------------|
//! | list, tuple, set | `[a, b]`, `(a, b)`, `{a, b}` | `[...]` |
//! | dict | one `key: value` pair per line | `{...}` |
//! | str, bytes | quoted atom, if over the cutoff | atom truncated to the cutoff |
//! | int, float, bool, None | | atom |
//! | type | | `class Name` |
//! | tag | the tag itself | the tag itself |

mod collections;
mod scalars;
mod text;

use repr_core::types::builtins;
use repr_core::{HandlerTable, Profile};

pub use text::{encode, hex, truncate};

/// The handler table for the built-in value kinds.
pub fn standard_table() -> HandlerTable {
    let mut table = HandlerTable::new();

    for ty in [&*builtins::LIST, &*builtins::TUPLE, &*builtins::SET] {
        table.register(ty, collections::flow);
        table.register_short(ty, collections::short);
    }
    table.register(&builtins::DICT, collections::dict);
    table.register_short(&builtins::DICT, collections::short);

    for ty in [&*builtins::STR, &*builtins::BYTES] {
        table.register(ty, text::full);
        table.register_short(ty, text::short);
    }

    table.register_short(&builtins::INT, scalars::number);
    table.register_short(&builtins::FLOAT, scalars::number);
    table.register_short(&builtins::BOOL, scalars::constant);
    table.register_short(&builtins::NONE, scalars::constant);
    table.register_short(&builtins::TYPE, scalars::class);

    table.register(&builtins::TAG, scalars::markup);
    table.register_short(&builtins::TAG, scalars::markup);

    tracing::trace!("standard handler table built");
    table
}

/// A profile holding only [`standard_table`].
pub fn standard_profile() -> Profile {
    Profile::new(standard_table())
}
