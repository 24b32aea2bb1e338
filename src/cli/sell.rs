// ABOUTME: CLI sell command - interactive sell-car wizard on stdin
//
// Resumes the saved draft, walks every step, uploads photos, then offers to submit.
// End of input saves progress so the next run continues where this one stopped.

use super::util::{option_line, CliContext};
use super::SellArgs;
use crate::draft::SellCarDraft;
use crate::submission::SubmissionAssembler;
use crate::wizard::{
    LocationSearch, OptionLoad, OptionProvider, PhotoChoice, SellWizard, StepId, StepOption,
};
use anyhow::Result;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, Lines};
use tracing::info;

/// Line-oriented prompt over any async reader
pub struct Prompter<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Print `question` and read one trimmed line; `None` at end of input
    pub async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }
}

/// What the user typed at an option list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Pick(usize),
    Back,
    More,
    Invalid,
}

/// Parse a 1-based menu answer; `b` goes back, `m` asks for more
pub fn parse_choice(input: &str, count: usize) -> Choice {
    match input.trim().to_ascii_lowercase().as_str() {
        "b" | "back" => Choice::Back,
        "m" | "more" => Choice::More,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 && n <= count => Choice::Pick(n - 1),
            _ => Choice::Invalid,
        },
    }
}

enum Flow {
    Continue,
    Quit,
}

struct Session<'a, R> {
    prompt: Prompter<R>,
    wizard: SellWizard,
    provider: OptionProvider,
    search: LocationSearch,
    assembler: &'a SubmissionAssembler,
}

pub async fn execute(args: SellArgs, ctx: &CliContext) -> Result<()> {
    let api = ctx.api()?;
    let assembler = ctx.assembler(api.clone())?;

    let mut wizard = SellWizard::new();
    if args.fresh {
        if assembler.discard(&mut wizard)? {
            println!("Discarded saved draft");
        }
    } else if let Some(draft) = assembler.store().load()? {
        println!("Resuming saved draft from {}", assembler.store().path().display());
        wizard = SellWizard::from_draft(&draft);
    }

    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    let mut session = Session {
        prompt: Prompter::new(reader),
        wizard,
        provider: OptionProvider::new(api.clone()),
        search: ctx.location_search(api),
        assembler: &assembler,
    };
    session.run().await
}

impl<R: AsyncBufRead + Unpin> Session<'_, R> {
    async fn run(&mut self) -> Result<()> {
        while !self.wizard.is_complete() {
            self.print_header();
            let step = self.wizard.current_step();
            let flow = match step {
                StepId::Location => self.location_step().await?,
                StepId::Price => self.price_step().await?,
                StepId::Photos => self.photos_step().await?,
                _ => self.option_step(step).await?,
            };
            if let Flow::Quit = flow {
                return self.save_progress();
            }
        }

        while self.wizard.registration_number().is_none() {
            let Some(input) = self.prompt.ask("Registration number: ").await? else {
                return self.save_progress();
            };
            if let Err(e) = self.wizard.set_registration_number(&input) {
                println!("{e}");
            }
        }

        let prepared = self.assembler.prepare(&mut self.wizard).await?;
        println!("Draft saved. Summary: {}", prepared.query);

        let answer = self.prompt.ask("Submit listing now? [y/N] ").await?;
        if matches!(answer.as_deref(), Some("y" | "Y" | "yes")) {
            let created = self.assembler.submit(&prepared.draft).await?;
            println!(
                "✅ Listing created{}",
                created.message.map(|m| format!(": {m}")).unwrap_or_default()
            );
        } else {
            println!("Run 'sellcar submit' when you are ready.");
        }
        Ok(())
    }

    fn print_header(&self) {
        let row: Vec<String> = self
            .wizard
            .header()
            .iter()
            .map(|h| {
                let marker = if h.active { ">" } else { " " };
                match &h.selected_label {
                    Some(label) => format!("{marker}{}: {label}", h.title),
                    None => format!("{marker}{}", h.title),
                }
            })
            .collect();
        println!();
        println!("{}", row.join(" | "));
        let step = self.wizard.current_step();
        println!(
            "Step {}/{}: {}",
            step.number(),
            StepId::total(),
            step.description()
        );
    }

    async fn option_step(&mut self, step: StepId) -> Result<Flow> {
        if let Some(message) = self.wizard.blocking_message(step) {
            println!("{message}");
            self.wizard.go_back();
            return Ok(Flow::Continue);
        }

        let options = match self.provider.load(step, self.wizard.selections()).await {
            OptionLoad::Fresh(options) => options,
            OptionLoad::Stale => return Ok(Flow::Continue),
        };
        if options.is_empty() {
            println!("No options available right now. Type 'b' to go back.");
        }
        for (i, option) in options.iter().enumerate() {
            println!("{:>3}. {}", i + 1, option_line(option));
        }

        let Some(input) = self.prompt.ask("Choose (number, b=back): ").await? else {
            return Ok(Flow::Quit);
        };
        match parse_choice(&input, options.len()) {
            Choice::Pick(i) => self.apply(step, &options[i]),
            Choice::Back => {
                self.wizard.go_back();
            }
            Choice::More | Choice::Invalid => println!("Please enter a number from the list"),
        }
        Ok(Flow::Continue)
    }

    fn apply(&mut self, step: StepId, option: &StepOption) {
        if let Err(e) = self.wizard.choose(step, option) {
            println!("{e}");
        }
    }

    async fn location_step(&mut self) -> Result<Flow> {
        let Some(query) = self.prompt.ask("Area, city or pincode: ").await? else {
            return Ok(Flow::Quit);
        };
        if query.eq_ignore_ascii_case("b") {
            self.wizard.go_back();
            return Ok(Flow::Continue);
        }

        self.search.on_input(&query);
        if !self.search.is_busy() {
            println!("Type at least 3 characters");
            return Ok(Flow::Continue);
        }
        self.search.settle().await;

        loop {
            let suggestions = self.search.suggestions();
            if suggestions.is_empty() {
                println!("No locations found, try another search");
                return Ok(Flow::Continue);
            }
            for (i, s) in suggestions.iter().enumerate() {
                println!("{:>3}. {}", i + 1, s.display());
            }
            let hint = if self.search.has_more() { ", m=more" } else { "" };
            let Some(input) = self
                .prompt
                .ask(&format!("Choose (number{hint}, b=new search): "))
                .await?
            else {
                return Ok(Flow::Quit);
            };

            match parse_choice(&input, suggestions.len()) {
                Choice::Pick(i) => {
                    if let Some(pick) = self.search.select(i) {
                        if let Err(e) = self.wizard.select_location(&pick) {
                            println!("{e}");
                        }
                    }
                    return Ok(Flow::Continue);
                }
                Choice::More => {
                    if self.search.fetch_next_page() {
                        self.search.settle().await;
                    }
                }
                Choice::Back => return Ok(Flow::Continue),
                Choice::Invalid => println!("Please enter a number from the list"),
            }
        }
    }

    async fn price_step(&mut self) -> Result<Flow> {
        let Some(input) = self.prompt.ask("Expected price (₹): ").await? else {
            return Ok(Flow::Quit);
        };
        if input.eq_ignore_ascii_case("b") {
            self.wizard.go_back();
        } else if let Err(e) = self.wizard.set_price(&input) {
            println!("{e}");
        }
        Ok(Flow::Continue)
    }

    async fn photos_step(&mut self) -> Result<Flow> {
        if self.wizard.selections().value(StepId::Photos).is_none() {
            for (i, choice) in PhotoChoice::all().iter().enumerate() {
                println!("{:>3}. {}", i + 1, choice.label());
            }
            let Some(input) = self.prompt.ask("Choose (number, b=back): ").await? else {
                return Ok(Flow::Quit);
            };
            match parse_choice(&input, PhotoChoice::all().len()) {
                Choice::Pick(i) => {
                    if let Err(e) = self.wizard.choose_photos(PhotoChoice::all()[i]) {
                        println!("{e}");
                    }
                }
                Choice::Back => {
                    self.wizard.go_back();
                }
                _ => println!("Please enter a number from the list"),
            }
            return Ok(Flow::Continue);
        }

        // upload-now chosen but nothing attached yet
        let Some(input) = self
            .prompt
            .ask("Photo file path (blank to choose another option): ")
            .await?
        else {
            return Ok(Flow::Quit);
        };
        if input.is_empty() {
            self.wizard.go_to(StepId::Price)?;
            return Ok(Flow::Continue);
        }
        let path = PathBuf::from(&input);
        if path.is_file() {
            self.wizard.attach_photo(path);
        } else {
            println!("No such file: {input}");
        }
        Ok(Flow::Continue)
    }

    fn save_progress(&self) -> Result<()> {
        let store = self.assembler.store();
        let mut draft = store.load()?.unwrap_or_else(SellCarDraft::new);
        draft.merge_wizard(&self.wizard);
        store.save(&draft)?;
        info!("Saved wizard progress at {}", self.wizard.current_step());
        println!();
        println!("Progress saved. Run 'sellcar sell' to continue.");
        Ok(())
    }
}
