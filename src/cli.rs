// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    opt(name, help).required(true)
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Row id as shown by list")
}

pub fn build_cli() -> Command {
    Command::new("spendwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Multi-currency expense tracking with period budgets")
        .subcommand(Command::new("init").about("Create the database if it does not exist"))
        .subcommand(
            Command::new("category")
                .about("Manage spending categories")
                .subcommand(
                    Command::new("add").arg(Arg::new("name").required(true).help("Category name")),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rm").arg(Arg::new("name").required(true).help("Category name")),
                ),
        )
        .subcommand(
            Command::new("currency")
                .about("Manage currencies")
                .subcommand(
                    Command::new("add")
                        .arg(req("code", "ISO 4217 code, e.g. CHF"))
                        .arg(req("name", "Display name"))
                        .arg(opt("symbol", "Display symbol (defaults to the code)")),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse expenses")
                .subcommand(
                    Command::new("add")
                        .arg(req("date", "YYYY-MM-DD, not in the future"))
                        .arg(req("amount", "Positive amount, at most 2 decimals"))
                        .arg(req("currency", "Currency code"))
                        .arg(req("category", "Category name"))
                        .arg(req("description", "What the money went on"))
                        .arg(opt("notes", "Free-form notes"))
                        .arg(
                            Arg::new("preview")
                                .long("preview")
                                .action(ArgAction::SetTrue)
                                .help("Show the budget impact without saving"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(opt("month", "Only YYYY-MM"))
                        .arg(opt("category", "Only this category"))
                        .arg(opt("search", "Match description or notes"))
                        .arg(opt("limit", "Max rows").value_parser(value_parser!(usize))),
                ))
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Total expenses and top category in the home currency")
                        .arg(opt("month", "Only YYYY-MM")),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(opt("date", "YYYY-MM-DD"))
                        .arg(opt("amount", "New amount"))
                        .arg(opt("currency", "Currency code"))
                        .arg(opt("category", "Category name"))
                        .arg(opt("description", "Description"))
                        .arg(opt("notes", "Notes (empty string clears)")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("budget")
                .about("Period budgets, status and alerts")
                .subcommand(
                    Command::new("add")
                        .arg(req("category", "Category name"))
                        .arg(req("amount", "Allocated amount"))
                        .arg(req("currency", "Currency code"))
                        .arg(req("period", "daily|weekly|monthly|quarterly|yearly or 0-4"))
                        .arg(req("start", "Start date YYYY-MM-DD"))
                        .arg(opt("description", "Optional description")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include inactive budgets"),
                    ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(opt("category", "Category name"))
                        .arg(opt("amount", "Allocated amount"))
                        .arg(opt("currency", "Currency code"))
                        .arg(opt("period", "Budget period"))
                        .arg(opt("start", "Start date YYYY-MM-DD"))
                        .arg(opt("description", "Description (empty string clears)"))
                        .arg(
                            opt("active", "true|false")
                                .value_parser(value_parser!(bool)),
                        ),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(json_flags(
                    Command::new("status").about("Spending against each active budget"),
                ))
                .subcommand(json_flags(
                    Command::new("alerts").about("Budgets over or close to their limit"),
                ))
                .subcommand(json_flags(
                    Command::new("overview")
                        .about("Totals across active budgets in the home currency"),
                )),
        )
        .subcommand(
            Command::new("fx")
                .about("Exchange rates")
                .subcommand(
                    Command::new("set-home").arg(Arg::new("currency").required(true)),
                )
                .subcommand(
                    Command::new("add")
                        .arg(req("date", "YYYY-MM-DD"))
                        .arg(req("base", "Base currency"))
                        .arg(req("quote", "Quote currency"))
                        .arg(req("rate", "1 base = rate quote")),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("fetch").arg(
                        opt("days", "Days of history")
                            .value_parser(value_parser!(usize))
                            .default_value("120"),
                    ),
                )
                .subcommand(
                    Command::new("convert")
                        .arg(req("date", "YYYY-MM-DD"))
                        .arg(req("amount", "Amount"))
                        .arg(req("from", "From currency"))
                        .arg(req("to", "To currency")),
                ),
        )
        .subcommand(
            Command::new("feedback")
                .about("Send and review feedback")
                .subcommand(
                    Command::new("submit")
                        .arg(req("type", "bug|feature|improvement|question|complaint"))
                        .arg(req("priority", "low|medium|high|critical"))
                        .arg(req("subject", "5-200 characters"))
                        .arg(req("description", "10-2000 characters")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            opt("format", "csv|json")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(req("out", "Output file")),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Home currency and alert thresholds")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-thresholds")
                        .arg(req("warning", "Warning threshold in percent"))
                        .arg(req("over", "Over-budget threshold in percent")),
                ),
        )
}
