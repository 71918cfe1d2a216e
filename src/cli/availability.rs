use clap::Args;

use crate::scheduling::AvailabilityQuery;

#[derive(Args)]
pub struct RangeArgs {
    /// Start of the range, YYYY-MM-DD or RFC 3339
    #[arg(long)]
    pub start: String,
    /// End of the range, YYYY-MM-DD or RFC 3339
    #[arg(long)]
    pub end: String,
    #[arg(long = "service-id")]
    pub service_ids: Vec<String>,
    #[arg(long = "employee-id")]
    pub employee_ids: Vec<String>,
}

impl From<RangeArgs> for AvailabilityQuery {
    fn from(args: RangeArgs) -> Self {
        AvailabilityQuery {
            employee_ids: args.employee_ids.into_iter().collect(),
            service_ids: args.service_ids.into_iter().collect(),
            start: args.start,
            end: args.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_args_into_query() {
        let query: AvailabilityQuery = RangeArgs {
            start: String::from("2024-01-01"),
            end: String::from("2024-01-07"),
            service_ids: vec![String::from("svc-42"), String::from("svc-42")],
            employee_ids: vec![],
        }
        .into();
        assert_eq!(query.service_ids.len(), 1);
        assert!(query.employee_ids.is_empty());
        assert_eq!(query.end, "2024-01-07");
    }
}
