use anyhow::{Result, anyhow};
use console::{Key, Term, style};
use dialoguer::{Input, Password};

pub enum MenuChoice {
    Back,
    Quit,
    Index(usize),
}

/// What a sub-screen asks the main loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

const MENU_HELP: &str = "Type a number + Enter, or use arrow keys + Enter. 'b' = back, 'q' = quit.";

pub fn print_header(header: Option<&str>) {
    let _ = Term::stdout().clear_screen();
    if let Some(h) = header {
        println!("{}", style(h).bold());
    }
}

/// Numbered menu. The first key decides between arrow navigation and typed input.
pub fn prompt_menu<S: AsRef<str>>(
    prompt: &str,
    items: &[S],
    default: Option<usize>,
    header: Option<&str>,
) -> Result<MenuChoice> {
    let term = Term::stdout();
    print_header(header);
    println!("{}", prompt);
    for (i, it) in items.iter().enumerate() {
        println!("{}: {}", i + 1, it.as_ref());
    }
    println!("{}", MENU_HELP);

    match term.read_key()? {
        Key::ArrowUp | Key::ArrowDown | Key::Home | Key::End => {
            arrow_select(prompt, items, default, header)
        }
        Key::Char('q') | Key::Char('Q') => Ok(MenuChoice::Quit),
        Key::Char('b') | Key::Char('B') | Key::Escape => Ok(MenuChoice::Back),
        Key::Enter => default
            .map(MenuChoice::Index)
            .ok_or_else(|| anyhow!("no selection")),
        Key::Char(c) if !c.is_control() => {
            let input: String = Input::new()
                .with_prompt("Selection")
                .allow_empty(true)
                .with_initial_text(c.to_string())
                .interact_text()?;
            parse_selection(&input, items.len(), default)
        }
        _ => {
            let input: String = Input::new()
                .with_prompt("Selection")
                .allow_empty(true)
                .interact_text()?;
            parse_selection(&input, items.len(), default)
        }
    }
}

/// Like [`prompt_menu`], but re-asks on invalid input instead of failing.
pub fn menu_loop<S: AsRef<str>>(
    prompt: &str,
    items: &[S],
    default: Option<usize>,
    header: Option<&str>,
) -> Result<MenuChoice> {
    loop {
        match prompt_menu(prompt, items, default, header) {
            Ok(choice) => return Ok(choice),
            Err(err) if err.downcast_ref::<std::io::Error>().is_some() => return Err(err),
            Err(err) => {
                println!("{}", style(format!("{}; try again", err)).yellow());
                pause()?;
            }
        }
    }
}

pub fn parse_selection(input: &str, len: usize, default: Option<usize>) -> Result<MenuChoice> {
    let s = input.trim();
    if s.is_empty() {
        return default
            .map(MenuChoice::Index)
            .ok_or_else(|| anyhow!("no selection"));
    }
    if s.eq_ignore_ascii_case("q") {
        return Ok(MenuChoice::Quit);
    }
    if s.eq_ignore_ascii_case("b") {
        return Ok(MenuChoice::Back);
    }
    let idx: usize = s.parse().map_err(|_| anyhow!("invalid selection"))?;
    if idx == 0 || idx > len {
        return Err(anyhow!("out of range"));
    }
    Ok(MenuChoice::Index(idx - 1))
}

fn arrow_select<S: AsRef<str>>(
    prompt: &str,
    items: &[S],
    default: Option<usize>,
    header: Option<&str>,
) -> Result<MenuChoice> {
    let term = Term::stdout();
    let last = items.len().saturating_sub(1);
    let mut sel = default.unwrap_or(0).min(last);
    loop {
        print_header(header);
        println!("{}", prompt);
        for (i, it) in items.iter().enumerate() {
            let marker = if i == sel { ">" } else { " " };
            println!("{} {}: {}", marker, i + 1, it.as_ref());
        }
        println!("Use arrows + Enter. 'b' = back, 'q' = quit.");

        match term.read_key()? {
            Key::ArrowUp => sel = sel.saturating_sub(1),
            Key::ArrowDown => sel = (sel + 1).min(last),
            Key::Home => sel = 0,
            Key::End => sel = last,
            Key::Enter if !items.is_empty() => return Ok(MenuChoice::Index(sel)),
            Key::Char('q') | Key::Char('Q') => return Ok(MenuChoice::Quit),
            Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(MenuChoice::Back),
            _ => {}
        }
    }
}

/// Masked input. Returns an empty string when the user just presses Enter.
pub fn prompt_secret(prompt: &str) -> Result<String> {
    Ok(Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?)
}

pub fn prompt_text(prompt: &str, initial: &str) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if !initial.is_empty() {
        input = input.with_initial_text(initial);
    }
    Ok(input.interact_text()?)
}

pub fn prompt_temperature(current: f64) -> Result<f64> {
    Ok(Input::<f64>::new()
        .with_prompt("Temperature (0.0 - 1.0)")
        .default(current)
        .validate_with(|v: &f64| -> Result<(), &str> {
            if (0.0..=1.0).contains(v) {
                Ok(())
            } else {
                Err("temperature must be between 0.0 and 1.0")
            }
        })
        .interact_text()?)
}

pub fn pause() -> Result<()> {
    println!();
    println!("Press any key to continue.");
    Term::stdout().read_key()?;
    Ok(())
}

pub fn warn(msg: &str) {
    println!("{}", style(msg).yellow().bold());
}

pub fn success(msg: &str) {
    println!("{}", style(msg).green().bold());
}

pub fn note(msg: &str) {
    println!("{}", style(msg).dim());
}

pub fn error(msg: &str) {
    println!("{}", style(msg).red());
}
