//! Menu entries and selection parsing.

use std::fmt;

/// One numbered menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Mint,
    Owner,
    Name,
    Symbol,
    TokenUri,
    OwnerOf,
    Balance,
    Transfer,
    Pay,
    Exit,
}

impl MenuChoice {
    /// Entries in display order.
    pub const ALL: [MenuChoice; 10] = [
        MenuChoice::Mint,
        MenuChoice::Owner,
        MenuChoice::Name,
        MenuChoice::Symbol,
        MenuChoice::TokenUri,
        MenuChoice::OwnerOf,
        MenuChoice::Balance,
        MenuChoice::Transfer,
        MenuChoice::Pay,
        MenuChoice::Exit,
    ];

    /// Parse a line of user input. Anything but a listed number is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let number: u8 = input.trim().parse().ok()?;
        Self::ALL.into_iter().find(|choice| choice.number() == number)
    }

    pub fn number(self) -> u8 {
        match self {
            MenuChoice::Mint => 1,
            MenuChoice::Owner => 2,
            MenuChoice::Name => 3,
            MenuChoice::Symbol => 4,
            MenuChoice::TokenUri => 5,
            MenuChoice::OwnerOf => 6,
            MenuChoice::Balance => 7,
            MenuChoice::Transfer => 8,
            MenuChoice::Pay => 9,
            MenuChoice::Exit => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Mint => "Mint a NFT",
            MenuChoice::Owner => "View the contract owner",
            MenuChoice::Name => "View the contract name",
            MenuChoice::Symbol => "View the contract symbol",
            MenuChoice::TokenUri => "View a token URI by ID",
            MenuChoice::OwnerOf => "View the owner of a token by ID",
            MenuChoice::Balance => "View the balance of an address",
            MenuChoice::Transfer => "Transfer a NFT",
            MenuChoice::Pay => "Pay for a NFT",
            MenuChoice::Exit => "Exit",
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.number(), self.label())
    }
}

/// The full menu, one entry per line.
pub fn render_menu() -> String {
    let mut menu = String::from("\nChoose an option:\n");
    for choice in MenuChoice::ALL {
        menu.push_str(&format!("  {}\n", choice));
    }
    menu
}
