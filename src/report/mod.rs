mod aggregate;
mod table;

pub(crate) use aggregate::{
    category_breakdown, compare_periods, filter_records, monthly_summary, top_categories,
    DEFAULT_TOP_N,
};
pub(crate) use table::{
    breakdown_table, categories_table, comparison_table, format_amount, records_table, render_text,
    summary_table, top_table, users_table, write_csv, ReportTable,
};
