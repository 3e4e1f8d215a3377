// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Date and time functions.
//!
//! NOW and the current date/time family read the statement-frozen clock
//! from the session; SYSDATE alone reads the wall clock on every call.
//! Functions that walk the calendar (weekday, week numbers, TO_DAYS)
//! return NULL for the zero-date sentinel, while plain component
//! extraction (YEAR, MONTH, DAY) reads the stored digits as-is.

use myexpr_function::{
	calendar::{
		Interval, IntervalUnit, calc_week, date_diff, day_number, day_of_year, from_day_number,
		last_day, make_date, months_to_period, normalize_week_mode, period_to_months, weekday,
		weekday_of,
	},
	calendar::interval::{add_interval, timestamp_diff},
	format::{StrToDateResult, format_date_time, format_time_only, str_to_date},
};
use myexpr_type::{
	Result, Value, Warning,
	value::{Date, DateTime},
};

use crate::{
	context::SessionContext,
	expr::ScalarExpr,
	func::{
		FuncExpr, FuncMeta, Nullability, date_arg, datetime_arg, f64_arg, i64_arg, str_arg,
		time_arg, ty_date, ty_datetime, ty_int8, ty_text, ty_time,
	},
};

fn calendar_date(ctx: &SessionContext, value: &Value) -> Option<Date> {
	let date = date_arg(ctx, value)?;
	// the zero sentinel has no place on the real calendar
	if date.month() == 0 || date.day() == 0 {
		return None;
	}
	Some(date)
}

// Current date and time

fn eval_now(_node: &FuncExpr, ctx: &SessionContext, _values: Vec<Value>) -> Result<Value> {
	Ok(Value::datetime(ctx.now()))
}

fn eval_sysdate(_node: &FuncExpr, ctx: &SessionContext, _values: Vec<Value>) -> Result<Value> {
	Ok(Value::datetime(ctx.sysdate()))
}

fn eval_curdate(_node: &FuncExpr, ctx: &SessionContext, _values: Vec<Value>) -> Result<Value> {
	Ok(Value::date(ctx.now().date()))
}

fn eval_curtime(_node: &FuncExpr, ctx: &SessionContext, _values: Vec<Value>) -> Result<Value> {
	Ok(Value::time(ctx.now().time()))
}

// Component extraction

fn eval_date(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match datetime_arg(ctx, &values[0]) {
		Some(dt) => Ok(Value::date(dt.date())),
		None => Ok(Value::Null),
	}
}

fn eval_time(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match time_arg(ctx, &values[0]) {
		Some(t) => Ok(Value::time(t)),
		None => Ok(Value::Null),
	}
}

fn eval_year(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match date_arg(ctx, &values[0]) {
		Some(d) => Ok(Value::int8(d.year() as i64)),
		None => Ok(Value::Null),
	}
}

fn eval_month(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match date_arg(ctx, &values[0]) {
		Some(d) => Ok(Value::int8(d.month() as i64)),
		None => Ok(Value::Null),
	}
}

fn eval_day(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match date_arg(ctx, &values[0]) {
		Some(d) => Ok(Value::int8(d.day() as i64)),
		None => Ok(Value::Null),
	}
}

fn eval_quarter(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match date_arg(ctx, &values[0]) {
		Some(d) => Ok(Value::int8(((d.month() + 2) / 3) as i64)),
		None => Ok(Value::Null),
	}
}

fn eval_hour(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match time_arg(ctx, &values[0]) {
		Some(t) => Ok(Value::int8(t.hour() as i64)),
		None => Ok(Value::Null),
	}
}

fn eval_minute(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match time_arg(ctx, &values[0]) {
		Some(t) => Ok(Value::int8(t.minute() as i64)),
		None => Ok(Value::Null),
	}
}

fn eval_second(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match time_arg(ctx, &values[0]) {
		Some(t) => Ok(Value::int8(t.second() as i64)),
		None => Ok(Value::Null),
	}
}

fn eval_microsecond(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match time_arg(ctx, &values[0]) {
		Some(t) => Ok(Value::int8(t.microsecond() as i64)),
		None => Ok(Value::Null),
	}
}

// Calendar walks

fn eval_dayname(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(date) = calendar_date(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	match format_date_time(&DateTime::from_date(date), "%W") {
		Some(s) => Ok(Value::text_with(s, node.collation().0)),
		None => Ok(Value::Null),
	}
}

fn eval_monthname(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(date) = date_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	if date.month() == 0 {
		return Ok(Value::Null);
	}
	match format_date_time(&DateTime::from_date(date), "%M") {
		Some(s) => Ok(Value::text_with(s, node.collation().0)),
		None => Ok(Value::Null),
	}
}

fn eval_dayofweek(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(date) = calendar_date(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	let daynr = day_number(date.year() as i32, date.month(), date.day());
	// 1 = Sunday .. 7 = Saturday
	Ok(Value::int8(weekday_of(daynr, true) as i64 + 1))
}

fn eval_weekday(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(date) = calendar_date(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	// 0 = Monday .. 6 = Sunday
	Ok(Value::int8(weekday(&date) as i64))
}

fn eval_dayofyear(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(date) = calendar_date(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	Ok(Value::int8(day_of_year(&date) as i64))
}

fn eval_week(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(date) = calendar_date(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	let mode = match values.get(1) {
		Some(v) => match i64_arg(ctx, v) {
			Some(m) => m as u32,
			None => return Ok(Value::Null),
		},
		None => 0,
	};
	let (_, week) = calc_week(&date, normalize_week_mode(mode));
	Ok(Value::int8(week as i64))
}

fn eval_weekofyear(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(date) = calendar_date(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	// WEEKOFYEAR(d) is WEEK(d, 3): ISO week, Monday first
	let (_, week) = calc_week(&date, normalize_week_mode(3));
	Ok(Value::int8(week as i64))
}

fn eval_yearweek(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(date) = calendar_date(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	let mode = match values.get(1) {
		Some(v) => match i64_arg(ctx, v) {
			Some(m) => m as u32,
			None => return Ok(Value::Null),
		},
		None => 0,
	};
	let (year, week) = calc_week(&date, normalize_week_mode(mode).with_year());
	Ok(Value::int8(year as i64 * 100 + week as i64))
}

fn eval_to_days(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(date) = calendar_date(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	Ok(Value::int8(day_number(date.year() as i32, date.month(), date.day())))
}

fn eval_from_days(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	match i64_arg(ctx, &values[0]) {
		Some(n) => Ok(Value::date(from_day_number(n))),
		None => Ok(Value::Null),
	}
}

fn eval_last_day(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(date) = date_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	match last_day(&date) {
		Some(d) => Ok(Value::date(d)),
		None => Ok(Value::Null),
	}
}

fn eval_makedate(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(year), Some(doy)) = (i64_arg(ctx, &values[0]), i64_arg(ctx, &values[1])) else {
		return Ok(Value::Null);
	};
	if doy < 1 || !(0..=9999).contains(&year) {
		return Ok(Value::Null);
	}
	let year = Date::adjust_two_digit_year(year as i32);
	match make_date(year, doy) {
		Some(d) => Ok(Value::date(d)),
		None => Ok(Value::Null),
	}
}

// Interval arithmetic

fn interval_args(
	ctx: &SessionContext,
	values: &[Value],
) -> Option<(DateTime, Interval, IntervalUnit, bool)> {
	let input_is_date = matches!(&values[0], Value::Date(_))
		|| matches!(&values[0], Value::Text(_) if Date::parse(&values[0].to_string()).is_some());
	let dt = datetime_arg(ctx, &values[0])?;
	let count = str_arg(ctx, &values[1])?;
	let unit = str_arg(ctx, &values[2])?;
	let unit = IntervalUnit::parse(&unit)?;
	let interval = Interval::parse(unit, &count)?;
	Some((dt, interval, unit, input_is_date))
}

fn date_arith(ctx: &SessionContext, values: Vec<Value>, negate: bool) -> Result<Value> {
	let Some((dt, interval, unit, input_is_date)) = interval_args(ctx, &values) else {
		return Ok(Value::Null);
	};
	let interval = if negate {
		interval.negated()
	} else {
		interval
	};
	let Some(result) = add_interval(&dt, &interval) else {
		ctx.push_warning(Warning::truncated_wrong_value("datetime", &values[0]));
		return Ok(Value::Null);
	};
	if input_is_date && unit.keeps_date() && !interval.has_time_part() && !result.has_time_part()
	{
		return Ok(Value::date(result.date()));
	}
	Ok(Value::datetime(result))
}

fn eval_date_add(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	date_arith(ctx, values, false)
}

fn eval_date_sub(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	date_arith(ctx, values, true)
}

fn eval_datediff(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(left), Some(right)) =
		(calendar_date(ctx, &values[0]), calendar_date(ctx, &values[1]))
	else {
		return Ok(Value::Null);
	};
	Ok(Value::int8(date_diff(&left, &right)))
}

fn eval_timestampdiff(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(unit) = str_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	let Some(unit) = IntervalUnit::parse(&unit) else {
		return Ok(Value::Null);
	};
	let (Some(from), Some(to)) = (datetime_arg(ctx, &values[1]), datetime_arg(ctx, &values[2]))
	else {
		return Ok(Value::Null);
	};
	match timestamp_diff(unit, &from, &to) {
		Some(n) => Ok(Value::int8(n)),
		None => Ok(Value::Null),
	}
}

// Formatting and parsing

fn eval_date_format(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(dt), Some(pattern)) = (datetime_arg(ctx, &values[0]), str_arg(ctx, &values[1]))
	else {
		return Ok(Value::Null);
	};
	match format_date_time(&dt, &pattern) {
		Some(s) => Ok(Value::text_with(s, node.collation().0)),
		None => Ok(Value::Null),
	}
}

fn eval_time_format(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(time), Some(pattern)) = (time_arg(ctx, &values[0]), str_arg(ctx, &values[1]))
	else {
		return Ok(Value::Null);
	};
	match format_time_only(&time, &pattern) {
		Some(s) => Ok(Value::text_with(s, node.collation().0)),
		None => Ok(Value::Null),
	}
}

fn eval_str_to_date(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(input), Some(pattern)) = (str_arg(ctx, &values[0]), str_arg(ctx, &values[1]))
	else {
		return Ok(Value::Null);
	};
	match str_to_date(&input, &pattern) {
		Some(StrToDateResult::Date(d)) => Ok(Value::date(d)),
		Some(StrToDateResult::Time(t)) => Ok(Value::time(t)),
		Some(StrToDateResult::DateTime(dt)) => Ok(Value::datetime(dt)),
		None => {
			ctx.push_warning(Warning::incorrect_datetime(&input, "str_to_date"));
			Ok(Value::Null)
		}
	}
}

// Unix epoch

fn eval_from_unixtime(node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(seconds) = f64_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	if seconds < 0.0 {
		return Ok(Value::Null);
	}
	let whole = seconds.floor();
	let micro = ((seconds - whole) * 1_000_000.0).round() as u32;
	let Some(dt) = DateTime::from_unix(whole as i64, micro.min(999_999)) else {
		return Ok(Value::Null);
	};
	match values.get(1) {
		None => Ok(Value::datetime(dt)),
		Some(v) => {
			let Some(pattern) = str_arg(ctx, v) else {
				return Ok(Value::Null);
			};
			match format_date_time(&dt, &pattern) {
				Some(s) => Ok(Value::text_with(s, node.collation().0)),
				None => Ok(Value::Null),
			}
		}
	}
}

fn eval_unix_timestamp(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let dt = match values.first() {
		None => ctx.now(),
		Some(v) => match datetime_arg(ctx, v) {
			Some(dt) => dt,
			None => return Ok(Value::Null),
		},
	};
	// out of the supported epoch range reads as 0
	Ok(Value::int8(dt.to_unix().unwrap_or(0)))
}

// Periods

fn period_arg(ctx: &SessionContext, value: &Value) -> Option<u64> {
	let p = i64_arg(ctx, value)?;
	if p < 0 {
		return None;
	}
	Some(p as u64)
}

fn eval_period_add(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(period), Some(months)) = (period_arg(ctx, &values[0]), i64_arg(ctx, &values[1]))
	else {
		return Ok(Value::Null);
	};
	let total = period_to_months(period) as i64 + months;
	if total < 0 {
		return Ok(Value::Null);
	}
	Ok(Value::int8(months_to_period(total as u64) as i64))
}

fn eval_period_diff(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let (Some(left), Some(right)) = (period_arg(ctx, &values[0]), period_arg(ctx, &values[1]))
	else {
		return Ok(Value::Null);
	};
	Ok(Value::int8(period_to_months(left) as i64 - period_to_months(right) as i64))
}

// EXTRACT

fn eval_extract(_node: &FuncExpr, ctx: &SessionContext, values: Vec<Value>) -> Result<Value> {
	let Some(unit) = str_arg(ctx, &values[0]) else {
		return Ok(Value::Null);
	};
	let Some(unit) = IntervalUnit::parse(&unit) else {
		return Ok(Value::Null);
	};
	let Some(dt) = datetime_arg(ctx, &values[1]) else {
		return Ok(Value::Null);
	};
	let date = dt.date();
	let (d, h, mi, s, us) = (
		date.day() as i64,
		dt.hour() as i64,
		dt.minute() as i64,
		dt.second() as i64,
		dt.microsecond() as i64,
	);
	let out = match unit {
		IntervalUnit::Year => date.year() as i64,
		IntervalUnit::Quarter => ((date.month() + 2) / 3) as i64,
		IntervalUnit::Month => date.month() as i64,
		IntervalUnit::Week => {
			if date.month() == 0 || date.day() == 0 {
				return Ok(Value::Null);
			}
			calc_week(&date, normalize_week_mode(0)).1 as i64
		}
		IntervalUnit::Day => d,
		IntervalUnit::Hour => h,
		IntervalUnit::Minute => mi,
		IntervalUnit::Second => s,
		IntervalUnit::Microsecond => us,
		IntervalUnit::YearMonth => date.year() as i64 * 100 + date.month() as i64,
		IntervalUnit::DayHour => d * 100 + h,
		IntervalUnit::DayMinute => d * 10_000 + h * 100 + mi,
		IntervalUnit::DaySecond => d * 1_000_000 + h * 10_000 + mi * 100 + s,
		IntervalUnit::DayMicrosecond => (d * 1_000_000 + h * 10_000 + mi * 100 + s) * 1_000_000 + us,
		IntervalUnit::HourMinute => h * 100 + mi,
		IntervalUnit::HourSecond => h * 10_000 + mi * 100 + s,
		IntervalUnit::HourMicrosecond => (h * 10_000 + mi * 100 + s) * 1_000_000 + us,
		IntervalUnit::MinuteSecond => mi * 100 + s,
		IntervalUnit::MinuteMicrosecond => (mi * 100 + s) * 1_000_000 + us,
		IntervalUnit::SecondMicrosecond => s * 1_000_000 + us,
	};
	Ok(Value::int8(out))
}

macro_rules! meta {
	($static_name:ident, $name:literal, $desc:literal, $min:expr, $max:expr, $prop:expr, $null:expr, $volatile:expr, $ty:expr, $eval:expr) => {
		pub(super) static $static_name: FuncMeta = FuncMeta {
			name: $name,
			description: $desc,
			min_args: $min,
			max_args: $max,
			propagates_null: $prop,
			nullability: $null,
			volatile: $volatile,
			result_type: $ty,
			eval: $eval,
		};
	};
}

meta!(NOW, "now", "statement start time, frozen per statement", 0, 0, false, Nullability::Never, false, ty_datetime, eval_now);
meta!(SYSDATE, "sysdate", "wall-clock time at the moment of the call", 0, 0, false, Nullability::Never, true, ty_datetime, eval_sysdate);
meta!(CURDATE, "curdate", "current date from the statement clock", 0, 0, false, Nullability::Never, false, ty_date, eval_curdate);
meta!(CURTIME, "curtime", "current time from the statement clock", 0, 0, false, Nullability::Never, false, ty_time, eval_curtime);
meta!(DATE, "date", "date part of a datetime", 1, 1, true, Nullability::Always, false, ty_date, eval_date);
meta!(TIME, "time", "time part of a datetime", 1, 1, true, Nullability::Always, false, ty_time, eval_time);
meta!(YEAR, "year", "year component", 1, 1, true, Nullability::Always, false, ty_int8, eval_year);
meta!(MONTH, "month", "month component, 0 for the zero date", 1, 1, true, Nullability::Always, false, ty_int8, eval_month);
meta!(DAY, "day", "day-of-month component", 1, 1, true, Nullability::Always, false, ty_int8, eval_day);
meta!(QUARTER, "quarter", "quarter 1..4", 1, 1, true, Nullability::Always, false, ty_int8, eval_quarter);
meta!(HOUR, "hour", "hour component, may exceed 23 for durations", 1, 1, true, Nullability::Always, false, ty_int8, eval_hour);
meta!(MINUTE, "minute", "minute component", 1, 1, true, Nullability::Always, false, ty_int8, eval_minute);
meta!(SECOND, "second", "second component", 1, 1, true, Nullability::Always, false, ty_int8, eval_second);
meta!(MICROSECOND, "microsecond", "microsecond component", 1, 1, true, Nullability::Always, false, ty_int8, eval_microsecond);
meta!(DAYNAME, "dayname", "English weekday name", 1, 1, true, Nullability::Always, false, ty_text, eval_dayname);
meta!(MONTHNAME, "monthname", "English month name", 1, 1, true, Nullability::Always, false, ty_text, eval_monthname);
meta!(DAYOFWEEK, "dayofweek", "1 = Sunday .. 7 = Saturday", 1, 1, true, Nullability::Always, false, ty_int8, eval_dayofweek);
meta!(WEEKDAY, "weekday", "0 = Monday .. 6 = Sunday", 1, 1, true, Nullability::Always, false, ty_int8, eval_weekday);
meta!(DAYOFYEAR, "dayofyear", "day of year 1..366", 1, 1, true, Nullability::Always, false, ty_int8, eval_dayofyear);
meta!(WEEK, "week", "week number under an 8-mode flag word", 1, 2, true, Nullability::Always, false, ty_int8, eval_week);
meta!(WEEKOFYEAR, "weekofyear", "ISO week number, 1..53", 1, 1, true, Nullability::Always, false, ty_int8, eval_weekofyear);
meta!(YEARWEEK, "yearweek", "year*100 + week, year-adjusted", 1, 2, true, Nullability::Always, false, ty_int8, eval_yearweek);
meta!(TO_DAYS, "to_days", "day number since year 0", 1, 1, true, Nullability::Always, false, ty_int8, eval_to_days);
meta!(FROM_DAYS, "from_days", "date from a day number", 1, 1, true, Nullability::Always, false, ty_date, eval_from_days);
meta!(LAST_DAY, "last_day", "last day of the argument's month", 1, 1, true, Nullability::Always, false, ty_date, eval_last_day);
meta!(MAKEDATE, "makedate", "date from a year and day-of-year", 2, 2, true, Nullability::Always, false, ty_date, eval_makedate);
meta!(DATE_ADD, "date_add", "add an interval to a date or datetime", 3, 3, true, Nullability::Always, false, ty_datetime, eval_date_add);
meta!(DATE_SUB, "date_sub", "subtract an interval from a date or datetime", 3, 3, true, Nullability::Always, false, ty_datetime, eval_date_sub);
meta!(DATEDIFF, "datediff", "whole days from the second date to the first", 2, 2, true, Nullability::Always, false, ty_int8, eval_datediff);
meta!(TIMESTAMPDIFF, "timestampdiff", "whole units between two datetimes", 3, 3, true, Nullability::Always, false, ty_int8, eval_timestampdiff);
meta!(DATE_FORMAT, "date_format", "render a datetime through a %-pattern", 2, 2, true, Nullability::Always, false, ty_text, eval_date_format);
meta!(TIME_FORMAT, "time_format", "render a time through a %-pattern", 2, 2, true, Nullability::Always, false, ty_text, eval_time_format);
meta!(STR_TO_DATE, "str_to_date", "parse text through a %-pattern", 2, 2, true, Nullability::Always, false, ty_datetime, eval_str_to_date);
meta!(FROM_UNIXTIME, "from_unixtime", "datetime from epoch seconds", 1, 2, true, Nullability::Always, false, ty_datetime, eval_from_unixtime);
meta!(UNIX_TIMESTAMP, "unix_timestamp", "epoch seconds of the argument or now", 0, 1, true, Nullability::Always, false, ty_int8, eval_unix_timestamp);
meta!(PERIOD_ADD, "period_add", "add months to a YYYYMM period", 2, 2, true, Nullability::Always, false, ty_int8, eval_period_add);
meta!(PERIOD_DIFF, "period_diff", "months between two YYYYMM periods", 2, 2, true, Nullability::Always, false, ty_int8, eval_period_diff);
meta!(EXTRACT, "extract", "named component of a datetime", 2, 2, true, Nullability::Always, false, ty_int8, eval_extract);

pub(super) fn all() -> Vec<&'static FuncMeta> {
	vec![
		&NOW,
		&SYSDATE,
		&CURDATE,
		&CURTIME,
		&DATE,
		&TIME,
		&YEAR,
		&MONTH,
		&DAY,
		&QUARTER,
		&HOUR,
		&MINUTE,
		&SECOND,
		&MICROSECOND,
		&DAYNAME,
		&MONTHNAME,
		&DAYOFWEEK,
		&WEEKDAY,
		&DAYOFYEAR,
		&WEEK,
		&WEEKOFYEAR,
		&YEARWEEK,
		&TO_DAYS,
		&FROM_DAYS,
		&LAST_DAY,
		&MAKEDATE,
		&DATE_ADD,
		&DATE_SUB,
		&DATEDIFF,
		&TIMESTAMPDIFF,
		&DATE_FORMAT,
		&TIME_FORMAT,
		&STR_TO_DATE,
		&FROM_UNIXTIME,
		&UNIX_TIMESTAMP,
		&PERIOD_ADD,
		&PERIOD_DIFF,
		&EXTRACT,
	]
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::func::testing::{eval, eval_ok};

	fn s(v: &str) -> Value {
		Value::text(v)
	}

	#[test]
	fn test_now_is_frozen_sysdate_is_not() {
		let ctx = SessionContext::standalone(1);
		ctx.freeze_time(DateTime::parse("2024-05-01 12:00:00").unwrap());
		assert_eq!(
			eval(&ctx, &NOW, vec![]).unwrap(),
			Value::datetime(DateTime::parse("2024-05-01 12:00:00").unwrap())
		);
		assert_eq!(
			eval(&ctx, &CURDATE, vec![]).unwrap(),
			Value::date(Date::parse("2024-05-01").unwrap())
		);
		// the wall clock has long moved past the frozen instant
		assert_ne!(
			eval(&ctx, &SYSDATE, vec![]).unwrap(),
			Value::datetime(DateTime::parse("2024-05-01 12:00:00").unwrap())
		);
	}

	#[test]
	fn test_components() {
		assert_eq!(eval_ok(&YEAR, vec![s("2007-10-07")]), Value::int8(2007));
		assert_eq!(eval_ok(&MONTH, vec![s("2007-10-07")]), Value::int8(10));
		assert_eq!(eval_ok(&DAY, vec![s("2007-10-07")]), Value::int8(7));
		assert_eq!(eval_ok(&QUARTER, vec![s("2007-10-07")]), Value::int8(4));
		assert_eq!(eval_ok(&HOUR, vec![s("10:05:03")]), Value::int8(10));
		assert_eq!(eval_ok(&MINUTE, vec![s("10:05:03")]), Value::int8(5));
		assert_eq!(eval_ok(&SECOND, vec![s("10:05:03")]), Value::int8(3));
		assert_eq!(
			eval_ok(&MICROSECOND, vec![s("10:05:03.123456")]),
			Value::int8(123_456)
		);
	}

	#[test]
	fn test_zero_date_components_vs_calendar() {
		// stored digits read back as-is
		assert_eq!(eval_ok(&YEAR, vec![Value::date(Date::zero())]), Value::int8(0));
		assert_eq!(eval_ok(&MONTH, vec![Value::date(Date::zero())]), Value::int8(0));
		// but the calendar has no slot for the sentinel
		assert_eq!(eval_ok(&DAYOFWEEK, vec![Value::date(Date::zero())]), Value::Null);
		assert_eq!(eval_ok(&WEEK, vec![Value::date(Date::zero())]), Value::Null);
		assert_eq!(eval_ok(&TO_DAYS, vec![Value::date(Date::zero())]), Value::Null);
	}

	#[test]
	fn test_weekday_family() {
		// 2007-10-07 was a Sunday
		assert_eq!(eval_ok(&DAYOFWEEK, vec![s("2007-10-07")]), Value::int8(1));
		assert_eq!(eval_ok(&WEEKDAY, vec![s("2007-10-07")]), Value::int8(6));
		assert_eq!(eval_ok(&DAYNAME, vec![s("2007-10-07")]), s("Sunday"));
		assert_eq!(eval_ok(&MONTHNAME, vec![s("2007-10-07")]), s("October"));
		assert_eq!(eval_ok(&DAYOFYEAR, vec![s("2007-02-03")]), Value::int8(34));
	}

	#[test]
	fn test_week_modes() {
		assert_eq!(eval_ok(&WEEK, vec![s("2000-01-01")]), Value::int8(0));
		assert_eq!(
			eval_ok(&WEEK, vec![s("2000-01-01"), Value::int4(2)]),
			Value::int8(52)
		);
		assert_eq!(eval_ok(&WEEKOFYEAR, vec![s("2000-01-01")]), Value::int8(52));
		assert_eq!(eval_ok(&YEARWEEK, vec![s("2000-01-01")]), Value::int8(199_952));
		assert_eq!(
			eval_ok(&YEARWEEK, vec![s("1987-01-01")]),
			Value::int8(198_652)
		);
	}

	#[test]
	fn test_to_days_from_days() {
		assert_eq!(eval_ok(&TO_DAYS, vec![s("2007-10-07")]), Value::int8(733_321));
		assert_eq!(
			eval_ok(&FROM_DAYS, vec![Value::int8(733_321)]),
			Value::date(Date::parse("2007-10-07").unwrap())
		);
		assert_eq!(
			eval_ok(&FROM_DAYS, vec![Value::int8(100)]),
			Value::date(Date::zero())
		);
	}

	#[test]
	fn test_last_day_and_makedate() {
		assert_eq!(
			eval_ok(&LAST_DAY, vec![s("2024-02-05")]),
			Value::date(Date::parse("2024-02-29").unwrap())
		);
		assert_eq!(
			eval_ok(&MAKEDATE, vec![Value::int4(2011), Value::int4(31)]),
			Value::date(Date::parse("2011-01-31").unwrap())
		);
		assert_eq!(
			eval_ok(&MAKEDATE, vec![Value::int4(2011), Value::int4(0)]),
			Value::Null
		);
		// only years below 100 take the two-digit mapping
		assert_eq!(
			eval_ok(&MAKEDATE, vec![Value::int4(71), Value::int4(1)]),
			Value::date(Date::parse("1971-01-01").unwrap())
		);
		assert_eq!(
			eval_ok(&MAKEDATE, vec![Value::int4(2024), Value::int4(60)]),
			Value::date(Date::parse("2024-02-29").unwrap())
		);
	}

	#[test]
	fn test_date_add_keeps_date_for_date_units() {
		assert_eq!(
			eval_ok(&DATE_ADD, vec![s("2024-01-31"), s("1"), s("MONTH")]),
			Value::date(Date::parse("2024-02-29").unwrap())
		);
		assert_eq!(
			eval_ok(&DATE_ADD, vec![s("2024-01-01"), s("90"), s("MINUTE")]),
			Value::datetime(DateTime::parse("2024-01-01 01:30:00").unwrap())
		);
		assert_eq!(
			eval_ok(&DATE_SUB, vec![s("2024-03-01"), s("1"), s("DAY")]),
			Value::date(Date::parse("2024-02-29").unwrap())
		);
		// walking off the supported range degrades to NULL
		assert_eq!(
			eval_ok(&DATE_ADD, vec![s("9999-12-31"), s("1"), s("DAY")]),
			Value::Null
		);
	}

	#[test]
	fn test_datediff_and_timestampdiff() {
		assert_eq!(
			eval_ok(&DATEDIFF, vec![s("2007-12-31"), s("2007-12-30")]),
			Value::int8(1)
		);
		assert_eq!(
			eval_ok(&TIMESTAMPDIFF, vec![s("MONTH"), s("2003-02-01"), s("2003-05-01")]),
			Value::int8(3)
		);
		assert_eq!(
			eval_ok(&TIMESTAMPDIFF, vec![s("YEAR"), s("2002-05-01"), s("2001-01-01")]),
			Value::int8(-1)
		);
	}

	#[test]
	fn test_format_and_parse() {
		assert_eq!(
			eval_ok(&DATE_FORMAT, vec![s("2009-10-04 22:23:00"), s("%W %M %Y")]),
			s("Sunday October 2009")
		);
		assert_eq!(
			eval_ok(&TIME_FORMAT, vec![s("100:00:00"), s("%H %k")]),
			s("100 100")
		);
		assert_eq!(
			eval_ok(&STR_TO_DATE, vec![s("01,5,2013"), s("%d,%m,%Y")]),
			Value::date(Date::parse("2013-05-01").unwrap())
		);
		assert_eq!(eval_ok(&STR_TO_DATE, vec![s("nonsense"), s("%d,%m,%Y")]), Value::Null);
	}

	#[test]
	fn test_unix_roundtrip() {
		assert_eq!(
			eval_ok(&FROM_UNIXTIME, vec![Value::int8(0)]),
			Value::datetime(DateTime::parse("1970-01-01 00:00:00").unwrap())
		);
		assert_eq!(
			eval_ok(&UNIX_TIMESTAMP, vec![s("1970-01-02 00:00:00")]),
			Value::int8(86_400)
		);
		assert_eq!(eval_ok(&FROM_UNIXTIME, vec![Value::int8(-1)]), Value::Null);
	}

	#[test]
	fn test_periods() {
		assert_eq!(
			eval_ok(&PERIOD_ADD, vec![Value::int4(200801), Value::int4(2)]),
			Value::int8(200_803)
		);
		assert_eq!(
			eval_ok(&PERIOD_DIFF, vec![Value::int4(200802), Value::int4(200703)]),
			Value::int8(11)
		);
	}

	#[test]
	fn test_extract() {
		assert_eq!(eval_ok(&EXTRACT, vec![s("YEAR"), s("2019-07-02")]), Value::int8(2019));
		assert_eq!(
			eval_ok(&EXTRACT, vec![s("YEAR_MONTH"), s("2019-07-02 01:02:03")]),
			Value::int8(201_907)
		);
		assert_eq!(
			eval_ok(&EXTRACT, vec![s("DAY_MINUTE"), s("2019-07-02 01:02:03")]),
			Value::int8(2_0102)
		);
		assert_eq!(
			eval_ok(&EXTRACT, vec![s("MICROSECOND"), s("2003-01-02 10:30:00.000123")]),
			Value::int8(123)
		);
	}
}
