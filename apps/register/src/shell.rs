//! # Shell
//!
//! Line-oriented operator interface: parse a command, gate destructive ones
//! behind a confirmation, dispatch to a handler, print the result.
//!
//! ## Command Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  session    login, register, logout, quit                               │
//! │  checkout   scan, add, bulk, qty, price, remove, cart, abandon,         │
//! │             client, pay, payments, finalize                             │
//! │  history    edit <id>, cancel <id>*, history [date] [query],            │
//! │             receipt <id>                                                │
//! │  inventory  catalog [query], product add/rm*, stock                     │
//! │  customers  customers, customer add/rm*                                 │
//! │  reports    report <start> <end> [category] [subgroup]                  │
//! │  settings   methods, method add/rm/fee, company [set], backup           │
//! │             export/import*                                              │
//! │                                                                         │
//! │  * = asks "tem certeza?" first; the handler itself never prompts        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;

use chrono::{NaiveDate, Utc};

use pawshop_core::money::Money;
use pawshop_core::report::ReportFilter;
use pawshop_core::types::UnitType;

use crate::commands::{cart, config, customer, product, report, sale};
use crate::error::ShellError;
use crate::printer::ConsolePrinter;
use crate::state::{AppContext, Session};

/// What a dispatched command produced.
#[derive(Debug)]
pub enum Outcome {
    /// Text to show; keep running.
    Continue(String),
    /// Exit the shell.
    Quit,
}

/// Runs the interactive loop until EOF or `quit`.
pub fn run(ctx: &mut AppContext) -> io::Result<()> {
    let stdin = io::stdin();
    let mut printer = ConsolePrinter::new();

    println!("{}", greeting(ctx));

    loop {
        print!("{}", prompt(ctx));
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        match dispatch(ctx, &mut printer, &line, &mut ask_confirmation) {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Continue(output)) => {
                if !output.is_empty() {
                    println!("{}", output.trim_end());
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}

/// Parses one input line and runs it.
///
/// `confirm` is asked before destructive actions; answering no turns the
/// command into a no-op. Separated from the stdin loop so tests can drive
/// the whole surface without a terminal.
pub fn dispatch(
    ctx: &mut AppContext,
    printer: &mut ConsolePrinter,
    line: &str,
    confirm: &mut dyn FnMut(&str) -> bool,
) -> Result<Outcome, ShellError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, args)) = tokens.split_first() else {
        return Ok(Outcome::Continue(String::new()));
    };

    // Session commands work regardless of login state
    match command {
        "quit" | "exit" => return Ok(Outcome::Quit),
        "help" => return Ok(Outcome::Continue(help_text().to_string())),
        "login" => {
            let [username, password] = expect_args(args, "login <user> <password>")?;
            ctx.session.login(&ctx.store, username, password)?;
            return Ok(Outcome::Continue(format!("Welcome, {}!", username)));
        }
        "register" => {
            let [username, password, confirmation] =
                expect_args(args, "register <user> <password> <confirm>")?;
            config::register_user(ctx, username, password, confirmation)?;
            return Ok(Outcome::Continue(
                "User registered. Now 'login <user> <password>'.".to_string(),
            ));
        }
        _ => {}
    }

    if !ctx.session.is_authenticated() {
        return Err(ShellError::auth(if Session::needs_registration(&ctx.store) {
            "First run: create the admin with 'register <user> <password> <confirm>'"
        } else {
            "Login required: 'login <user> <password>'"
        }));
    }

    let output = match command {
        "logout" => {
            ctx.session.logout(&ctx.store)?;
            "Logged out".to_string()
        }

        // ---------------------------------------------------------------- cart
        "scan" => {
            let [code] = expect_args(args, "scan <code>")?;
            cart::scan(ctx, code)?
        }
        "add" => {
            let [code, qty] = expect_args(args, "add <code> <quantity>")?;
            cart::add(ctx, code, parse_quantity(qty)?)?
        }
        "bulk" => {
            let [code, amount] = expect_args(args, "bulk <code> <amount>")?;
            cart::add_amount(ctx, code, parse_money(amount)?)?
        }
        "qty" => {
            let [code, qty] = expect_args(args, "qty <code> <quantity>")?;
            cart::set_quantity(ctx, code, parse_quantity(qty)?)?
        }
        "price" => {
            let [code, amount] = expect_args(args, "price <code> <amount>")?;
            cart::set_price(ctx, code, parse_money(amount)?)?
        }
        "remove" => {
            let [code] = expect_args(args, "remove <code>")?;
            cart::remove(ctx, code)?
        }
        "cart" => cart::show(ctx),
        "abandon" | "abort" => cart::abandon(ctx)?,

        // ------------------------------------------------------------ checkout
        "client" => match args {
            ["-"] => sale::detach_customer(ctx)?,
            [] => return Err(ShellError::usage("client <name-or-id> | client -")),
            query => sale::attach_customer(ctx, &query.join(" "))?,
        },
        "pay" => match args.split_last() {
            Some((amount, method)) if !method.is_empty() => {
                sale::add_tender(ctx, &method.join(" "), parse_money(amount)?)?
            }
            _ => return Err(ShellError::usage("pay <method> <amount>")),
        },
        "payments" => sale::payments_view(ctx),
        "finalize" => sale::finalize(ctx, printer)?,

        // ------------------------------------------------------------- history
        "edit" => {
            let [sale_id] = expect_args(args, "edit <sale-id>")?;
            sale::begin_edit(ctx, sale_id)?
        }
        "cancel" => {
            let [sale_id] = expect_args(args, "cancel <sale-id>")?;
            if !confirm(&format!(
                "Cancel sale #{} and restore its stock? This cannot be undone.",
                sale_id
            )) {
                return Ok(Outcome::Continue("Aborted".to_string()));
            }
            sale::cancel(ctx, sale_id)?
        }
        "history" => {
            let (day, query) = match args {
                [] => (Utc::now().date_naive(), None),
                [date] => (parse_date(date)?, None),
                [date, rest @ ..] => (parse_date(date)?, Some(rest.join(" "))),
            };
            sale::history(ctx, day, query.as_deref())
        }
        "receipt" => {
            let [sale_id] = expect_args(args, "receipt <sale-id>")?;
            sale::reprint(ctx, sale_id, printer)?
        }

        // ----------------------------------------------------------- inventory
        "catalog" => product::list(ctx, &args.join(" "))?,
        "product" => match args {
            ["add", code, category, unit, price, cost, stock, name @ ..] if !name.is_empty() => {
                product::save(
                    ctx,
                    product::ProductForm {
                        code: code.to_string(),
                        name: name.join(" "),
                        category: category.to_string(),
                        subgroup: None,
                        unit_type: parse_unit(unit)?,
                        price: parse_money(price)?,
                        cost_price: parse_money(cost)?,
                        stock: parse_quantity(stock)?,
                    },
                )?
            }
            ["rm", code] => {
                if !confirm(&format!("Delete product {}?", code)) {
                    return Ok(Outcome::Continue("Aborted".to_string()));
                }
                product::delete(ctx, code)?
            }
            _ => {
                return Err(ShellError::usage(
                    "product add <code> <category> <un|kg> <price> <cost> <stock> <name...> | product rm <code>",
                ))
            }
        },
        "stock" => {
            let [code, qty] = expect_args(args, "stock <code> <quantity>")?;
            product::set_stock(ctx, code, parse_quantity(qty)?)?
        }

        // ----------------------------------------------------------- customers
        "customers" => customer::list(ctx)?,
        "customer" => match args {
            ["add", phone, name @ ..] if !name.is_empty() => {
                customer::add(ctx, &name.join(" "), phone)?
            }
            ["rm", id] => {
                if !confirm("Delete this customer?") {
                    return Ok(Outcome::Continue("Aborted".to_string()));
                }
                customer::delete(ctx, id)?
            }
            _ => {
                return Err(ShellError::usage(
                    "customer add <phone> <name...> | customer rm <id>",
                ))
            }
        },

        // ------------------------------------------------------------- reports
        "report" => match args {
            [start, end, rest @ ..] => {
                let mut filter = ReportFilter::range(parse_date(start)?, parse_date(end)?);
                if let Some(category) = rest.first() {
                    filter = filter.with_category(*category);
                }
                if let Some(subgroup) = rest.get(1) {
                    filter = filter.with_subgroup(*subgroup);
                }
                report::run(ctx, filter)?
            }
            _ => {
                return Err(ShellError::usage(
                    "report <start YYYY-MM-DD> <end YYYY-MM-DD> [category] [subgroup]",
                ))
            }
        },

        // ------------------------------------------------------------ settings
        "methods" => config::methods(ctx)?,
        "method" => match args {
            ["add", fee, name @ ..] if !name.is_empty() => {
                config::method_add(ctx, &name.join(" "), parse_percent(fee)?)?
            }
            ["rm", id] => config::method_remove(ctx, id)?,
            ["fee", id, fee] => config::method_fee(ctx, id, parse_percent(fee)?)?,
            _ => {
                return Err(ShellError::usage(
                    "method add <fee%> <name...> | method rm <id> | method fee <id> <fee%>",
                ))
            }
        },
        "company" => match args {
            [] => config::company(ctx)?,
            ["set", field, value @ ..] if !value.is_empty() => {
                config::company_set(ctx, field, &value.join(" "))?
            }
            _ => return Err(ShellError::usage("company | company set <field> <value...>")),
        },
        "backup" => match args {
            ["export", path] => config::backup_export(ctx, Path::new(path))?,
            ["import", path] => {
                if !confirm("Restoring a backup ERASES all current data. Continue?") {
                    return Ok(Outcome::Continue("Aborted".to_string()));
                }
                config::backup_import(ctx, Path::new(path))?
            }
            _ => return Err(ShellError::usage("backup export <file> | backup import <file>")),
        },

        other => {
            return Err(ShellError::usage(format!(
                "Unknown command '{}'. Try 'help'.",
                other
            )))
        }
    };

    Ok(Outcome::Continue(output))
}

// =============================================================================
// Parsing Helpers
// =============================================================================

fn expect_args<'a, const N: usize>(
    args: &[&'a str],
    usage: &str,
) -> Result<[&'a str; N], ShellError> {
    <[&str; N]>::try_from(args).map_err(|_| ShellError::usage(format!("Usage: {}", usage)))
}

fn parse_money(s: &str) -> Result<Money, ShellError> {
    Ok(s.parse::<Money>()?)
}

fn parse_quantity(s: &str) -> Result<f64, ShellError> {
    s.replace(',', ".")
        .parse::<f64>()
        .map_err(|_| ShellError::usage(format!("'{}' is not a valid quantity", s)))
}

fn parse_percent(s: &str) -> Result<f64, ShellError> {
    s.trim_end_matches('%')
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| ShellError::usage(format!("'{}' is not a valid percentage", s)))
}

fn parse_unit(s: &str) -> Result<UnitType, ShellError> {
    match s.to_lowercase().as_str() {
        "un" => Ok(UnitType::Un),
        "kg" => Ok(UnitType::Kg),
        other => Err(ShellError::usage(format!(
            "'{}' is not a unit type (un | kg)",
            other
        ))),
    }
}

/// Accepts 2026-03-14 and 14/03/2026.
fn parse_date(s: &str) -> Result<NaiveDate, ShellError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| ShellError::usage(format!("'{}' is not a date (YYYY-MM-DD)", s)))
}

// =============================================================================
// Terminal Plumbing
// =============================================================================

fn greeting(ctx: &AppContext) -> String {
    let company = ctx.store.settings().company();
    match ctx.session.current_user() {
        Some(user) => format!("{} - caixa aberto por {}. 'help' lists commands.", company.name, user),
        None if Session::needs_registration(&ctx.store) => format!(
            "{} - first run. Create the admin: 'register <user> <password> <confirm>'",
            company.name
        ),
        None => format!("{} - 'login <user> <password>' to open the register.", company.name),
    }
}

fn prompt(ctx: &AppContext) -> String {
    match ctx.checkout.editing() {
        Some(sale_id) => format!("pawshop[edit #{}]> ", sale_id),
        None if !ctx.checkout.cart.is_empty() => {
            format!("pawshop[{}]> ", ctx.checkout.cart.line_count())
        }
        None => "pawshop> ".to_string(),
    }
}

fn ask_confirmation(question: &str) -> bool {
    print!("{} [s/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes")
}

fn help_text() -> &'static str {
    "\
session    login <u> <p> | register <u> <p> <p> | logout | quit
checkout   scan <code> | add <code> <qty> | bulk <code> <amount>
           qty/price/remove <code> ... | cart | abandon
           client <name|-> | pay <method> <amount> | payments | finalize
history    history [date] [query] | edit <id> | cancel <id> | receipt <id>
inventory  catalog [query] | product add ... | product rm <code> | stock <code> <qty>
customers  customers | customer add <phone> <name> | customer rm <id>
reports    report <start> <end> [category] [subgroup]
settings   methods | method add/rm/fee | company [set <field> <v>]
           backup export <file> | backup import <file>"
}

// =============================================================================
// Unit Tests
// =============================================================================
