//! Welcome banner display for chat sessions.

use console::style;

/// Print the banner shown when the chat starts.
///
/// `resumed` is the title of a conversation being continued, if any.
pub fn print_welcome_banner(transport: &str, resumed: Option<&str>, data_dir: &str) {
    println!();
    println!(
        "  {} {}",
        style("§").cyan().bold(),
        style("Personal Injury Law Assistant").cyan().bold()
    );
    println!(
        "  {}",
        style("General information about Canadian personal injury claims. Not legal advice.").dim()
    );
    println!();
    println!("  {}  {}", style("Endpoint:").bold(), style(transport).dim());
    if let Some(title) = resumed {
        println!("  {}  {}", style("Resuming:").bold(), style(title).dim());
    }
    println!("  {}  {}", style("Saved to:").bold(), style(data_dir).dim());
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+C to stop a reply, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
