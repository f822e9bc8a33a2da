//! Item system
//!
//! Item instances, the bonus engine that derives their attributes, item
//! level and socket resolution, and owner-side save bookkeeping.

pub mod bonus;
pub mod item_level;
pub mod gems;
pub mod enchant;
pub mod state;
pub mod guid;
pub mod owner;
pub mod item;

pub use bonus::{BonusData, roll_random_bonus_list, MAX_ITEM_EFFECTS};
pub use item_level::{item_level, ItemLevelContext, MIN_ITEM_LEVEL, MAX_ITEM_LEVEL};
pub use gems::{gems_fit_sockets, SocketedGem, GemContribution, MAX_GEM_SOCKETS, MAX_GEM_BONUS_LISTS};
pub use enchant::{EnchantmentData, EnchantmentSlot, Enchantments, MAX_ENCHANTMENT_SLOT};
pub use state::ItemUpdateState;
pub use guid::{GuidGenerator, ItemGuid, OwnerGuid};
pub use owner::ItemOwner;
pub use item::{Item, ItemFlags, ItemModifiers, RefundInfo, REFUND_WINDOW_SECS};
