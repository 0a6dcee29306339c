use std::fmt::Write as _;

use crate::domain::ExtractionCatalog;

pub const EXTRACTION_SYSTEM_PROMPT: &str = "You read bank and credit card statements and list \
every transaction on the given page. Reply with a JSON object of the form \
{\"transactions\": [...]} and nothing else. Each transaction has: \
\"type\" (EXPENSE, INCOME or TRANSFER), \"amount\" (positive number, no currency symbol), \
\"date\" (YYYY-MM-DD), \"description\" (merchant or counterparty as printed), \
optional \"notes\", optional \"categoryId\", optional \"sourceAccountId\", \
optional \"destinationAccountId\" and optional \"possibleDuplicate\" (boolean). \
Only use ids from the provided catalogs; omit a field rather than guessing. \
Skip balances, subtotals and lines that are cut off at the page edge.";

pub const DUPLICATE_SYSTEM_PROMPT: &str = "You detect duplicate financial transactions. \
You receive records with an id, a provenance (\"existing\" records are already stored, \
\"new\" records were just extracted from a statement), a date, an amount and a description, \
plus hints from an exact-match pass. possibleDuplicate marks a record that was \
already flagged as a likely duplicate; treat it as context, not as proof. Two records \
are duplicates when they describe the same \
real purchase or payment, even if the descriptions are worded differently. \
Reply with a JSON object {\"duplicates\": [{\"duplicateId\": ..., \"originalId\": ..., \
\"reason\": ...}]}. duplicateId must always be a \"new\" record. Return an empty array when \
there are no duplicates.";

pub fn extraction_prompt(
    catalog: &ExtractionCatalog,
    page_number: usize,
    total_pages: usize,
) -> String {
    let mut prompt = format!(
        "This is page {} of {} of the statement.\n\nExpense categories:\n",
        page_number, total_pages
    );
    write_categories(&mut prompt, catalog, "EXPENSE");
    prompt.push_str("\nIncome categories:\n");
    write_categories(&mut prompt, catalog, "INCOME");
    prompt.push_str("\nAccounts:\n");
    if catalog.accounts.is_empty() {
        prompt.push_str("- (none)\n");
    }
    for account in &catalog.accounts {
        let _ = writeln!(prompt, "- {} | {} ({})", account.id, account.name, account.kind);
    }
    prompt
}

fn write_categories(prompt: &mut String, catalog: &ExtractionCatalog, kind: &str) {
    let mut any = false;
    for category in catalog.categories.iter().filter(|c| c.kind.as_str() == kind) {
        let _ = writeln!(prompt, "- {} | {}", category.id, category.name);
        any = true;
    }
    if !any {
        prompt.push_str("- (none)\n");
    }
}
