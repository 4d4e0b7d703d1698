// 运维小工具: 在 SQLite 后端上读写分级作用域配置。
//
// Usage:
//   scoped-config [--db PATH] [--settings FILE] [--json-log] get KEY [SCOPE]
//   scoped-config [--db PATH] [--settings FILE] [--json-log] set KEY VALUE [SCOPE]
//   scoped-config [--db PATH] [--settings FILE] [--json-log] delete KEY [SCOPE]
//
// SCOPE: node | workflow | project。get 不带 SCOPE 时按 node → workflow → project 级联查找。

use anyhow::{anyhow, bail, Context, Result};
use scoped_config::config::{ScopedConfigStore, StoreSettings};
use scoped_config::domain::Scope;
use scoped_config::logging;
use scoped_config::repository::SqliteStoreProvider;

const USAGE: &str = "usage: scoped-config [--db PATH] [--settings FILE] [--json-log] \
                     <get KEY [SCOPE] | set KEY VALUE [SCOPE] | delete KEY [SCOPE]>";

enum Command {
    Get { key: String, scope: Option<Scope> },
    Set { key: String, value: String, scope: Option<Scope> },
    Delete { key: String, scope: Option<Scope> },
}

struct Cli {
    db_path: Option<String>,
    settings_path: Option<String>,
    json_log: bool,
    command: Command,
}

fn parse_scope(arg: Option<String>) -> Result<Option<Scope>> {
    arg.map(|s| s.parse::<Scope>().map_err(|e| anyhow!(e)))
        .transpose()
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Cli> {
    let mut db_path = None;
    let mut settings_path = None;
    let mut json_log = false;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_path = Some(args.next().context("--db 缺少参数")?),
            "--settings" => settings_path = Some(args.next().context("--settings 缺少参数")?),
            "--json-log" => json_log = true,
            "-h" | "--help" => bail!(USAGE),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let op = positional.next().context(USAGE)?;
    let key = positional.next().context(USAGE)?;

    let command = match op.as_str() {
        "get" => Command::Get {
            key,
            scope: parse_scope(positional.next())?,
        },
        "set" => Command::Set {
            key,
            value: positional.next().context(USAGE)?,
            scope: parse_scope(positional.next())?,
        },
        "delete" => Command::Delete {
            key,
            scope: parse_scope(positional.next())?,
        },
        other => bail!("未知命令: {}\n{}", other, USAGE),
    };

    if positional.next().is_some() {
        bail!("参数过多\n{}", USAGE);
    }

    Ok(Cli {
        db_path,
        settings_path,
        json_log,
        command,
    })
}

fn main() -> Result<()> {
    let cli = parse_args(std::env::args().skip(1))?;

    if cli.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    let mut settings = match &cli.settings_path {
        Some(path) => StoreSettings::from_json_file(path)?,
        None => StoreSettings::from_env()?,
    };
    if cli.db_path.is_some() {
        settings.db_path = cli.db_path.clone();
    }

    let db_path = settings.resolved_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let provider = SqliteStoreProvider::new(&db_path)?.create_missing(true);
    let store = ScopedConfigStore::new(&settings, &provider)?;

    match cli.command {
        Command::Get { key, scope } => {
            let value = store.get(&key, scope)?;
            println!("{}", value);
        }
        Command::Set { key, value, scope } => store.set(&key, &value, scope)?,
        Command::Delete { key, scope } => store.delete(&key, scope)?,
    }

    Ok(())
}
