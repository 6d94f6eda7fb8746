use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, NaiveDate, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 按 UTC 日期筛选的区间 [start, end)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// 解析 YYYY-MM-DD 格式的起止日期；结束日期包含当天，即 end = endDate + 1 天
    pub fn parse(start_date: Option<&str>, end_date: Option<&str>) -> AppResult<Self> {
        let start = start_date
            .filter(|s| !s.is_empty())
            .map(parse_day_start)
            .transpose()?;
        let end = end_date
            .filter(|s| !s.is_empty())
            .map(|s| parse_day_start(s).map(|d| d + Duration::days(1)))
            .transpose()?;

        if let (Some(s), Some(e)) = (start, end)
            && s >= e
        {
            return Err(AppError::ValidationError(
                "startDate must not be after endDate".to_string(),
            ));
        }

        Ok(Self { start, end })
    }
}

fn parse_day_start(value: &str) -> AppResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        AppError::ValidationError(format!("Invalid date '{value}', expected YYYY-MM-DD"))
    })?;
    // 00:00:00 总是合法时间
    Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_end_date_is_inclusive() {
        let range = DateRange::parse(Some("2025-03-01"), Some("2025-03-31")).unwrap();
        assert_eq!(
            range.start,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            range.end,
            Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_same_day_range() {
        let range = DateRange::parse(Some("2025-03-01"), Some("2025-03-01")).unwrap();
        assert_eq!(range.end.unwrap() - range.start.unwrap(), Duration::days(1));
    }

    #[test]
    fn test_open_ended() {
        assert_eq!(DateRange::parse(None, None).unwrap(), DateRange::default());
        assert_eq!(DateRange::parse(Some(""), None).unwrap(), DateRange::default());
        assert!(DateRange::parse(Some("2025-03-01"), None).unwrap().end.is_none());
    }

    #[test]
    fn test_invalid_input() {
        assert!(DateRange::parse(Some("03/01/2025"), None).is_err());
        assert!(DateRange::parse(Some("2025-03-05"), Some("2025-03-01")).is_err());
    }
}
