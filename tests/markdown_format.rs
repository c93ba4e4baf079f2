use describepdf::{format_markdown_output, PageResult};

fn pages(specs: &[(usize, &str)]) -> Vec<PageResult> {
    specs
        .iter()
        .map(|&(n, d)| PageResult::new(n, d))
        .collect()
}

#[test]
fn golden_two_page_document() {
    let md = format_markdown_output(
        &pages(&[(1, "Page one content."), (2, "Page two content.")]),
        "test.pdf",
    );
    assert_eq!(
        md,
        "# Description of PDF: test.pdf\n\n\
         ## Page 1\n\nPage one content.\n\n---\n\n\
         ## Page 2\n\nPage two content.\n\n---\n\n"
    );
}

#[test]
fn formatting_twice_is_byte_identical() {
    let input = pages(&[(1, "Alpha"), (2, "Beta"), (5, "Epsilon")]);
    assert_eq!(
        format_markdown_output(&input, "doc.pdf"),
        format_markdown_output(&input, "doc.pdf")
    );
}

#[test]
fn header_always_names_the_file() {
    let md = format_markdown_output(&[], "empty.pdf");
    assert_eq!(md, "# Description of PDF: empty.pdf\n\n");
}

#[test]
fn sections_keep_given_order_and_numbers() {
    let md = format_markdown_output(&pages(&[(3, "c"), (1, "a")]), "doc.pdf");
    // The formatter trusts its input order; ordering is the orchestrator's
    // contract, keyed on page number.
    let three = md.find("## Page 3\n").unwrap();
    let one = md.find("## Page 1\n").unwrap();
    assert!(three < one);
}

#[test]
fn placeholder_descriptions_pass_through_verbatim() {
    let md = format_markdown_output(
        &pages(&[(2, "*Error: Could not render image for page 2.*")]),
        "doc.pdf",
    );
    assert!(md.contains("*Error: Could not render image for page 2.*"));
}

#[test]
fn blank_description_becomes_placeholder() {
    let md = format_markdown_output(&pages(&[(1, "")]), "doc.pdf");
    assert!(md.contains("## Page 1\n\n*No description generated for this page.*\n\n---\n\n"));
}
