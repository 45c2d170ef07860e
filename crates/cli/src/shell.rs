use std::io::{self, BufRead, Write};

use reviewdesk_core::{CustomerId, Entity};
use reviewdesk_infra::{EventLog, FileEventLog, ReviewStore, StoreError};

const MENU: &str = "\
==== Review Desk ====
1) Register customer
2) Log in
3) Submit review
4) Search product
5) Top rated products
6) Search history
0) Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Line-oriented menu loop. EOF on input ends the session like `exit`.
pub struct Shell<R, W, L = FileEventLog> {
    store: ReviewStore<L>,
    input: R,
    output: W,
    current: Option<CustomerId>,
}

impl<R, W, L> Shell<R, W, L>
where
    R: BufRead,
    W: Write,
    L: EventLog,
{
    pub fn new(store: ReviewStore<L>, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
            current: None,
        }
    }

    pub fn store(&self) -> &ReviewStore<L> {
        &self.store
    }

    /// The logged-in customer, if any.
    pub fn current_customer(&self) -> Option<&CustomerId> {
        self.current.as_ref()
    }

    /// Run until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("Choice")? else {
                break;
            };
            let flow = match choice.to_ascii_lowercase().as_str() {
                "1" | "register" => self.register()?,
                "2" | "login" => self.login()?,
                "3" | "review" => self.submit_review()?,
                "4" | "search" => self.search()?,
                "5" | "top" => self.top_rated()?,
                "6" | "history" => self.history()?,
                "0" | "exit" | "quit" => Flow::Exit,
                "" => Flow::Continue,
                other => {
                    writeln!(self.output, "Unknown option: {other}")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }
        writeln!(self.output, "Goodbye.")?;
        self.output.flush()
    }

    fn register(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt("Customer ID")? else {
            return Ok(Flow::Exit);
        };
        let Some(name) = self.prompt("Name")? else {
            return Ok(Flow::Exit);
        };

        match self.store.register_customer(&id, &name) {
            Ok(customer) => writeln!(self.output, "Registered {}.", customer.label())?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn login(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt("Customer ID")? else {
            return Ok(Flow::Exit);
        };

        match self.store.login(&id) {
            Ok(customer) => {
                writeln!(self.output, "Welcome, {}.", customer.name())?;
                self.current = Some(customer.id().clone());
            }
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn submit_review(&mut self) -> io::Result<Flow> {
        let Some(customer_id) = self.current.clone() else {
            writeln!(self.output, "Log in before submitting a review.")?;
            return Ok(Flow::Continue);
        };

        let Some(product_id) = self.prompt("Product ID")? else {
            return Ok(Flow::Exit);
        };
        // Known products keep their stored name, so only ask for new ones.
        let known_name = self
            .store
            .catalog()
            .find(&product_id)
            .ok()
            .map(|product| product.name().to_string());
        let product_name = match known_name {
            Some(name) => name,
            None => match self.prompt("Product name")? {
                Some(name) => name,
                None => return Ok(Flow::Exit),
            },
        };
        let Some(rating) = self.prompt("Rating (1-5)")? else {
            return Ok(Flow::Exit);
        };
        let Ok(rating) = rating.parse::<f64>() else {
            writeln!(self.output, "Error: rating must be a number, got {rating:?}")?;
            return Ok(Flow::Continue);
        };
        let Some(text) = self.prompt("Review")? else {
            return Ok(Flow::Exit);
        };

        match self.store.submit_review(
            &product_id,
            &product_name,
            customer_id.as_str(),
            rating,
            &text,
        ) {
            Ok(entry) => writeln!(self.output, "Review saved ({}★).", entry.rating)?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self) -> io::Result<Flow> {
        let Some(product_id) = self.prompt("Product ID")? else {
            return Ok(Flow::Exit);
        };

        match self.store.search_product(&product_id) {
            Ok(product) => {
                writeln!(
                    self.output,
                    "{}: average {:.2}★ over {} review(s)",
                    product.label(),
                    product.average_rating(),
                    product.review_count()
                )?;
                for review in product.reviews() {
                    writeln!(self.output, "  {}★ - {}", review.rating, review.text)?;
                }
            }
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn top_rated(&mut self) -> io::Result<Flow> {
        let Some(count) = self.prompt("How many")? else {
            return Ok(Flow::Exit);
        };
        let Ok(count) = count.parse::<i64>() else {
            writeln!(self.output, "Error: count must be a whole number, got {count:?}")?;
            return Ok(Flow::Continue);
        };

        match self.store.top_rated(count) {
            Ok(products) => {
                for (rank, product) in products.iter().enumerate() {
                    writeln!(
                        self.output,
                        "{}. {} - {:.2}★",
                        rank + 1,
                        product.label(),
                        product.average_rating()
                    )?;
                }
            }
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn history(&mut self) -> io::Result<Flow> {
        let history = self.store.search_history();
        if history.is_empty() {
            writeln!(self.output, "No searches yet.")?;
        }
        for (i, product_id) in history.iter().enumerate() {
            writeln!(self.output, "{}. {product_id}", i + 1)?;
        }
        Ok(Flow::Continue)
    }

    fn report(&mut self, error: StoreError) -> io::Result<()> {
        match error {
            StoreError::Persistence(e) => writeln!(
                self.output,
                "Warning: change kept for this session but not saved to disk ({e})."
            ),
            other => writeln!(self.output, "Error: {other}"),
        }
    }

    /// Prompt for one line. `None` means end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
