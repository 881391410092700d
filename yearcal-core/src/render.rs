//! LaTeX rendering of a resolved year.
//!
//! The document is produced as a sequence of fragments so it can be streamed
//! to a file; joining the fragments gives exactly [`LatexCalendar::render`].

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::iter;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::month::Week;
use crate::year_map::{MonthLabels, YearMap};

pub type Fragment = Cow<'static, str>;

const PREAMBLE: &str = r"\documentclass[8pt, a4paper]{article}
\usepackage[utf8]{inputenc}
\parindent 0mm
\hoffset -3.3cm
\textwidth 20cm
\pagestyle{empty}

\begin{document}
";

const MONTH_START: &str = r"\begin{tabular*}{20cm}{|l|l|l|p{5cm}|l|}
\hline
\textbf{Wk} & \textbf{Day} & \textbf{} & \textbf{Events} & \\
\hline
\hline
";

const WEEK_END: &str = "\\hline\n";

const MONTH_END: &str = "\\end{tabular*}\n\\newpage\n";

const END_DOCUMENT: &str = "\\end{document}\n";

/// A year map laid out as a printable LaTeX calendar, one month per page.
#[derive(Clone, Copy)]
pub struct LatexCalendar<'a> {
    year_map: &'a YearMap,
}

impl<'a> LatexCalendar<'a> {
    pub fn new(year_map: &'a YearMap) -> Self {
        LatexCalendar { year_map }
    }

    /// The document as a lazy sequence of fragments. Each call starts over.
    pub fn fragments(&self) -> impl Iterator<Item = Fragment> + 'a {
        let year_map = self.year_map;
        [Cow::Borrowed(PREAMBLE), Cow::Owned(year_title(year_map.year()))]
            .into_iter()
            .chain(year_map.months().flat_map(month_fragments))
            .chain(iter::once(Cow::Borrowed(END_DOCUMENT)))
    }

    pub fn render(&self) -> String {
        self.fragments().collect()
    }

    /// Stream the document into `writer` without building it in memory.
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for fragment in self.fragments() {
            writer.write_all(fragment.as_bytes())?;
        }
        writer.flush()
    }
}

impl fmt::Display for LatexCalendar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fragments().try_for_each(|fragment| f.write_str(&fragment))
    }
}

/// Render the whole document at once.
pub fn render(year_map: &YearMap) -> String {
    LatexCalendar::new(year_map).render()
}

fn year_title(year: i32) -> String {
    format!("\\textbf{{\\huge{{Calendar of the Year {year}}}}}\\\\\n\\\\\n")
}

fn month_title(month: &MonthLabels) -> String {
    let name = month
        .grid()
        .dates()
        .next()
        .map(|date| date.format("%B").to_string())
        .unwrap_or_default();
    format!("\\textbf{{\\large{{{name}}}}}\\\\\n\\\\\n")
}

fn month_fragments(month: &MonthLabels) -> impl Iterator<Item = Fragment> + '_ {
    let rows = month
        .grid()
        .weeks()
        .iter()
        .flat_map(move |week| week_fragments(month, week));

    [Cow::Owned(month_title(month)), Cow::Borrowed(MONTH_START)]
        .into_iter()
        .chain(rows)
        .chain(iter::once(Cow::Borrowed(MONTH_END)))
}

fn week_fragments<'m>(month: &'m MonthLabels, week: &'m Week) -> impl Iterator<Item = Fragment> + 'm {
    week.iter().flatten().flat_map(move |&date| {
        let separator = (date.weekday() == Weekday::Sun).then_some(Cow::Borrowed(WEEK_END));
        iter::once(Cow::Owned(day_row(month, date))).chain(separator)
    })
}

/// One table row: ISO week, weekday, day of month, labels.
fn day_row(month: &MonthLabels, date: NaiveDate) -> String {
    let labels = month
        .labels(date.day())
        .expect("year map has labels for every day in its grid");
    let labels = labels
        .iter()
        .map(|label| escape_latex(label))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} & {} & \\textbf{{{}}} & \\tiny{{{}}} & \\\\ \\hline\n",
        date.iso_week().week(),
        date.format("%a"),
        date.day(),
        labels
    )
}

/// Escape characters that LaTeX treats specially in running text.
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\textbackslash{}"),
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
