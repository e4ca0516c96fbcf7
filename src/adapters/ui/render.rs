//! Coloured terminal output: banner, post cards, status lines.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{Write, stdout};

/// Sky blue (#60a5fa).
const BLUE: (u8, u8, u8) = (0x60, 0xa5, 0xfa);
/// Purple (#a855f7).
const PURPLE: (u8, u8, u8) = (0xa8, 0x55, 0xf7);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

fn print_colored(color: Color, text: &str) {
    let mut out = stdout();
    let _ = out.execute(SetForegroundColor(color));
    let _ = out.execute(Print(text));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

/// "PostX" with a blue-to-purple gradient, tagline and version.
pub fn print_welcome() {
    let title = "P o s t X";
    let total = title.chars().count().max(2);
    println!();
    for (i, ch) in title.chars().enumerate() {
        let t = i as f64 / (total - 1) as f64;
        print_colored(rgb(lerp_rgb(BLUE, PURPLE, t)), &ch.to_string());
    }
    println!();
    print_colored(Color::Grey, "صانع البوستات بالذكاء الاصطناعي\n");
    print_colored(
        Color::DarkGrey,
        &format!("v{}\n\n", env!("CARGO_PKG_VERSION")),
    );
}

/// One post suggestion, framed.
pub fn print_post(title: &str, text: &str) {
    print_colored(rgb(PURPLE), &format!("\n── {} ──\n", title));
    println!("{}", text);
}

pub fn print_error(message: &str) {
    print_colored(Color::Red, &format!("✗ {}\n", message));
}

pub fn print_success(message: &str) {
    print_colored(Color::Green, &format!("✓ {}\n", message));
}

pub fn print_info(message: &str) {
    print_colored(Color::DarkGrey, &format!("{}\n", message));
}
