// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print as pretty JSON")
        .action(ArgAction::SetTrue)
}

fn jsonl_arg() -> Arg {
    Arg::new("jsonl")
        .long("jsonl")
        .help("Print as JSON lines")
        .action(ArgAction::SetTrue)
}

fn range_arg(default: &'static str) -> Arg {
    Arg::new("range")
        .long("range")
        .value_name("RANGE")
        .help("today|week|month|year|all")
        .default_value(default)
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand(
            Command::new("add")
                .about("Add a custom category")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .help("task|transaction|both")
                        .required(true),
                )
                .arg(Arg::new("icon").long("icon"))
                .arg(Arg::new("color").long("color").value_name("HEX")),
        )
        .subcommand(
            Command::new("list")
                .about("List categories")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .help("Only categories usable for task|transaction"),
                )
                .arg(json_arg())
                .arg(jsonl_arg()),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove a custom category")
                .arg(Arg::new("name").required(true)),
        )
}

fn task_cmd() -> Command {
    Command::new("task")
        .about("Manage tasks")
        .subcommand(
            Command::new("add")
                .about("Add a task")
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("desc").long("desc"))
                .arg(
                    Arg::new("deadline")
                        .long("deadline")
                        .value_name("YYYY-MM-DD")
                        .required(true),
                )
                .arg(
                    Arg::new("priority")
                        .long("priority")
                        .help("low|medium|high")
                        .default_value("medium"),
                )
                .arg(Arg::new("category").long("category").value_name("NAME")),
        )
        .subcommand(
            Command::new("list")
                .about("List tasks (pending only unless --all)")
                .arg(Arg::new("priority").long("priority").help("low|medium|high"))
                .arg(Arg::new("category").long("category").value_name("NAME"))
                .arg(Arg::new("search").long("search").value_name("TEXT"))
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("Include completed tasks")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_arg())
                .arg(jsonl_arg()),
        )
        .subcommand(
            Command::new("done").about("Mark a task completed").arg(
                Arg::new("id")
                    .required(true)
                    .value_parser(clap::value_parser!(i64)),
            ),
        )
        .subcommand(
            Command::new("rm").about("Delete a task").arg(
                Arg::new("id")
                    .required(true)
                    .value_parser(clap::value_parser!(i64)),
            ),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Manage transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .allow_negative_numbers(true)
                        .required(true),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .help("income|expense")
                        .required(true),
                )
                .arg(Arg::new("desc").long("desc").required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD [HH:MM]")
                        .help("Defaults to now"),
                )
                .arg(Arg::new("category").long("category").value_name("NAME"))
                .arg(Arg::new("method").long("method").value_name("METHOD"))
                .arg(Arg::new("tags").long("tags").value_name("A,B,C"))
                .arg(Arg::new("note").long("note"))
                .arg(Arg::new("photo").long("photo").value_name("REF")),
        )
        .subcommand(
            Command::new("list")
                .about("List transactions, most recent first")
                .arg(range_arg("all"))
                .arg(Arg::new("type").long("type").help("income|expense"))
                .arg(Arg::new("category").long("category").value_name("NAME"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(json_arg())
                .arg(jsonl_arg()),
        )
        .subcommand(
            Command::new("rm").about("Delete a transaction").arg(
                Arg::new("id")
                    .required(true)
                    .value_parser(clap::value_parser!(i64)),
            ),
        )
}

fn note_cmd() -> Command {
    Command::new("note")
        .about("Manage notes")
        .subcommand(
            Command::new("add")
                .about("Add a note")
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("body").long("body").default_value(""))
                .arg(
                    Arg::new("locked")
                        .long("locked")
                        .help("Protect with a password (prompted)")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List notes (locked bodies are hidden)")
                .arg(Arg::new("search").long("search").value_name("TEXT"))
                .arg(
                    Arg::new("locked")
                        .long("locked")
                        .help("Only locked notes")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("unlocked")
                        .long("unlocked")
                        .help("Only unlocked notes")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("locked"),
                )
                .arg(json_arg())
                .arg(jsonl_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("Show a note (prompts for the password when locked)")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("rm").about("Delete a note").arg(
                Arg::new("id")
                    .required(true)
                    .value_parser(clap::value_parser!(i64)),
            ),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Financial reports")
        .subcommand(
            Command::new("overview")
                .about("Income, expenses, balance, savings rate")
                .arg(range_arg("month"))
                .arg(json_arg())
                .arg(jsonl_arg()),
        )
        .subcommand(
            Command::new("breakdown")
                .about("Per-category totals with percentage shares")
                .arg(range_arg("month"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .help("income|expense")
                        .default_value("expense"),
                )
                .arg(json_arg())
                .arg(jsonl_arg()),
        )
        .subcommand(
            Command::new("top")
                .about("Top categories by total")
                .arg(range_arg("month"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .help("income|expense")
                        .default_value("expense"),
                )
                .arg(
                    Arg::new("n")
                        .long("n")
                        .default_value("5")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(json_arg())
                .arg(jsonl_arg()),
        )
        .subcommand(
            Command::new("insights")
                .about("Plain-language takeaways for the period")
                .arg(range_arg("month")),
        )
        .subcommand(
            Command::new("cashflow")
                .about("Monthly income/expense totals")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .default_value("12")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(json_arg())
                .arg(jsonl_arg()),
        )
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("Show or change settings")
        .subcommand(Command::new("show").about("Show current settings"))
        .subcommand(
            Command::new("set")
                .about("Set a setting")
                .arg(
                    Arg::new("key")
                        .help("currency|week-start")
                        .required(true),
                )
                .arg(Arg::new("value").required(true)),
        )
}

fn import_cmd() -> Command {
    Command::new("import").about("Import records").subcommand(
        Command::new("transactions")
            .about("Import transactions from CSV")
            .arg(Arg::new("path").long("path").required(true)),
    )
}

fn export_cmd() -> Command {
    let fmt_args = |c: Command| {
        c.arg(
            Arg::new("format")
                .long("format")
                .help("csv|json")
                .required(true),
        )
        .arg(Arg::new("out").long("out").required(true))
    };
    Command::new("export")
        .about("Export records")
        .subcommand(fmt_args(Command::new("transactions")))
        .subcommand(fmt_args(Command::new("tasks")))
        .subcommand(fmt_args(Command::new("notes")))
}

pub fn build_cli() -> Command {
    Command::new("lifeclip")
        .version(crate_version!())
        .about("Personal tasks, notes, and money tracking with local-first storage")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(config_cmd())
        .subcommand(category_cmd())
        .subcommand(task_cmd())
        .subcommand(tx_cmd())
        .subcommand(note_cmd())
        .subcommand(report_cmd())
        .subcommand(
            Command::new("dashboard").about("Combined tasks, money, and notes snapshot"),
        )
        .subcommand(import_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}
