//! Itemforge - Entry Point
//!
//! Small command line front end over the item library: create items,
//! inspect stored ones, and export the built-in game data.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use itemforge::config::{settings_path, Settings};
use itemforge::data::{DataManager, GameData};
use itemforge::items::{GuidGenerator, Item, ItemLevelContext, ItemOwner, ItemUpdateState, OwnerGuid};
use itemforge::save::{ItemStore, JsonFileStore, Transaction};

const USAGE: &str = "usage:
  itemforge create <template_id> [count] [bonus_list_id...]
  itemforge show <item_guid>
  itemforge list
  itemforge export-data <path.ron>";

/// Owner used for items created from the command line
const CLI_OWNER: OwnerGuid = OwnerGuid(1);

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let settings_file = match args.iter().position(|a| a == "--settings") {
        Some(pos) if pos + 1 < args.len() => {
            let path = PathBuf::from(args.remove(pos + 1));
            args.remove(pos);
            path
        }
        Some(_) => bail!("--settings needs a path\n{}", USAGE),
        None => settings_path(),
    };
    let settings = Settings::load(&settings_file);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_filter.as_str())
    )
    .init();

    log::info!("Starting Itemforge v{}", env!("CARGO_PKG_VERSION"));

    let data = DataManager::new(settings.data_file.as_deref());

    match args.first().map(String::as_str) {
        Some("create") => create(&args[1..], &settings, &data),
        Some("show") => show(&args[1..], &settings, &data),
        Some("list") => list(&settings, &data),
        Some("export-data") => {
            let path = args.get(1).context("export-data needs a path")?;
            data.export_ron(Path::new(path))?;
            println!("Wrote {} templates to {}", data.template_count(), path);
            Ok(())
        }
        _ => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

fn parse_u32(text: &str, what: &str) -> Result<u32> {
    text.parse().with_context(|| format!("invalid {}: {:?}", what, text))
}

fn create(args: &[String], settings: &Settings, data: &DataManager) -> Result<()> {
    let template_id = parse_u32(args.first().context("create needs a template id")?, "template id")?;
    let count = match args.get(1) {
        Some(text) => parse_u32(text, "count")?,
        None => 1,
    };
    let bonus_lists = args
        .iter()
        .skip(2)
        .map(|text| parse_u32(text, "bonus list id"))
        .collect::<Result<Vec<_>>>()?;

    let mut store = JsonFileStore::open(&settings.store_path)?;
    let highest = store.item_guids()?.last().copied().unwrap_or(0);
    let mut guids = GuidGenerator::starting_after(highest);
    let mut owner = ItemOwner::new(CLI_OWNER);

    let mut item = Item::create(template_id, count, 0, Some(CLI_OWNER), &mut guids, data)?;
    if bonus_lists.is_empty() {
        item.roll_random_bonus_list(&mut rand::thread_rng(), data);
    }
    for id in bonus_lists {
        item.add_bonus_list(id, data);
    }
    item.set_state(ItemUpdateState::Changed, Some(&mut owner));

    let mut tx = Transaction::new();
    owner.save_queued(std::slice::from_mut(&mut item), &mut tx);
    store.commit(tx)?;

    print_item(&item, data);
    println!("Saved to {}", store.path().display());
    Ok(())
}

fn show(args: &[String], settings: &Settings, data: &DataManager) -> Result<()> {
    let guid = args.first().context("show needs an item guid")?;
    let guid: u64 = guid.parse().with_context(|| format!("invalid item guid: {:?}", guid))?;

    let store = JsonFileStore::open(&settings.store_path)?;
    let persisted = store.load_item(guid)?.with_context(|| format!("no item {} in store", guid))?;
    let item = Item::load(&persisted, data)?;

    print_item(&item, data);
    if item.is_refundable() {
        println!("  refund expired: {}", item.is_refund_expired(settings.refund_window_secs));
    }
    Ok(())
}

fn list(settings: &Settings, data: &DataManager) -> Result<()> {
    let store = JsonFileStore::open(&settings.store_path)?;
    for guid in store.item_guids()? {
        let Some(persisted) = store.load_item(guid)? else {
            continue;
        };
        let name = data
            .item_template(persisted.item.template_id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("<template {}>", persisted.item.template_id));
        println!("{:>6}  {} x{}", guid, name, persisted.item.count);
    }
    Ok(())
}

fn print_item(item: &Item, data: &DataManager) {
    let bonus = item.bonus();
    println!("{} {} x{}", item.guid(), item.template().name, item.count());
    println!("  quality:        {}", bonus.quality.name());
    println!("  item level:     {}", item.item_level(&ItemLevelContext::catalog(), data));
    println!("  required level: {}", item.required_level(data));
    println!("  bonus lists:    {:?}", item.bonus_list_ids());
    println!("  sockets:        {:?}", bonus.socket_colors);
    println!("  durability:     {}/{}", item.durability(), item.max_durability());
    for index in 0..bonus.stat_types.len() {
        if let Some((stat_type, weight)) = bonus.stat(index) {
            println!("  stat {:>3}:       {}", stat_type, weight);
        }
    }
    for (slot, enchantment) in item.enchantments().iter().filter(|(_, e)| e.id != 0) {
        println!("  enchant {:?}: {} ({}s, {} charges)", slot, enchantment.id, enchantment.duration, enchantment.charges);
    }
    for (slot, gem) in item.gems().iter().enumerate() {
        if let Some(gem) = gem {
            println!("  gem {}:          {}", slot, gem.item_id);
        }
    }
    println!("  disenchantable: {}", item.can_be_disenchanted());
}
