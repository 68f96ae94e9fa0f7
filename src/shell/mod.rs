//! Interactive console.
//!
//! Reads a menu selection and its arguments per iteration, runs one
//! contract operation, and prints the result or a diagnostic. Failures never
//! end the loop; `0` or end of input does.

pub mod menu;

use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::blockchain::types::{NftError, GENERIC_DIAGNOSTIC};
use crate::nft::{render_value, MintReceipt, NftContract, TxReceipt};

pub use menu::{render_menu, MenuChoice};

pub const INVALID_CHOICE: &str = "Just enter valid choices!";

/// Console loop over an input and an output stream.
pub struct Shell<R, W> {
    nft: NftContract,
    input: R,
    output: W,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(nft: NftContract, input: R, output: W) -> Self {
        Self { nft, input, output }
    }

    /// Run until `0` is chosen or input ends.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{}", render_menu())?;
            let Some(line) = self.prompt("Enter your choice: ").await? else {
                break;
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Exit) => break,
                Some(choice) => {
                    if !self.dispatch(choice).await? {
                        break;
                    }
                }
                None => writeln!(self.output, "{}", INVALID_CHOICE)?,
            }
        }
        writeln!(self.output, "Bye!")?;
        self.output.flush()
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run one operation. Returns `false` if input ended while reading its
    /// arguments.
    async fn dispatch(&mut self, choice: MenuChoice) -> io::Result<bool> {
        tracing::debug!(choice = %choice, "Menu selection");
        match choice {
            MenuChoice::Mint => {
                let Some(uri) = self.prompt("Enter the token URI: ").await? else {
                    return Ok(false);
                };
                match self.nft.mint_nft(&uri).await {
                    Ok(receipt) => print_mint_receipt(&mut self.output, &receipt)?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::Owner => match self.nft.owner().await {
                Ok(owner) => writeln!(self.output, "Contract owner: {}", owner)?,
                Err(e) => self.report(&e)?,
            },
            MenuChoice::Name => match self.nft.name().await {
                Ok(name) => writeln!(self.output, "Contract name: {}", name)?,
                Err(e) => self.report(&e)?,
            },
            MenuChoice::Symbol => match self.nft.symbol().await {
                Ok(symbol) => writeln!(self.output, "Contract symbol: {}", symbol)?,
                Err(e) => self.report(&e)?,
            },
            MenuChoice::TokenUri => {
                let Some(token_id) = self.prompt("Enter the token ID: ").await? else {
                    return Ok(false);
                };
                match self.nft.token_uri(&token_id).await {
                    Ok(uri) => writeln!(self.output, "Token URI: {}", uri)?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::OwnerOf => {
                let Some(token_id) = self.prompt("Enter the token ID: ").await? else {
                    return Ok(false);
                };
                match self.nft.owner_of(&token_id).await {
                    Ok(owner) => writeln!(self.output, "Token owner: {}", owner)?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::Balance => {
                let Some(account) = self.prompt("Enter the account address: ").await? else {
                    return Ok(false);
                };
                match self.nft.balance_of(&account).await {
                    Ok(balance) => writeln!(self.output, "Balance: {}", balance)?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::Transfer => {
                let Some(to) = self.prompt("Enter the recipient address: ").await? else {
                    return Ok(false);
                };
                let Some(token_id) = self.prompt("Enter the token ID: ").await? else {
                    return Ok(false);
                };
                match self.nft.transfer(&to, &token_id).await {
                    Ok(receipt) => print_tx_receipt(&mut self.output, "Transfer", &receipt)?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::Pay => {
                let Some(recipient) = self.prompt("Enter the recipient address: ").await? else {
                    return Ok(false);
                };
                match self.nft.pay(&recipient).await {
                    Ok(receipt) => print_tx_receipt(&mut self.output, "Payment", &receipt)?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::Exit => return Ok(false),
        }
        Ok(true)
    }

    async fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn report(&mut self, err: &NftError) -> io::Result<()> {
        report_error(&mut self.output, err)
    }
}

/// Print the diagnostic for `err`; generic failures also get the error text.
pub fn report_error<W: Write>(out: &mut W, err: &NftError) -> io::Result<()> {
    tracing::warn!(kind = ?err.kind(), error = %err, "Operation failed");
    let diagnostic = err.diagnostic();
    writeln!(out, "{}", diagnostic)?;
    if diagnostic == GENERIC_DIAGNOSTIC {
        writeln!(out, "{}", err)?;
    }
    Ok(())
}

pub fn print_mint_receipt<W: Write>(out: &mut W, receipt: &MintReceipt) -> io::Result<()> {
    writeln!(out, "NFT minted!")?;
    if let Some(token_id) = receipt.token_id {
        writeln!(out, "Token ID: {}", token_id)?;
    }
    writeln!(out, "Transaction hash: {}", receipt.tx_hash)?;
    for (name, value) in &receipt.arguments {
        writeln!(out, "  {}: {}", name, render_value(value))?;
    }
    Ok(())
}

fn print_tx_receipt<W: Write>(out: &mut W, what: &str, receipt: &TxReceipt) -> io::Result<()> {
    writeln!(out, "{} sent! Transaction hash: {}", what, receipt.tx_hash)?;
    if let Some(block) = receipt.block_number {
        writeln!(out, "Mined in block {}", block)?;
    }
    Ok(())
}
