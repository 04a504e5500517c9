// Create the Error, ErrorKind, ResultExt, and Result types.
// Result is a typedef of std `Result` with the error type our own `Error`.
// ResultExt adds the `chain_err` trait method.
use error_chain::error_chain;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        Image(::image::ImageError);
    }

    errors {
        MalformedGrid(reason: String) {
            description("malformed grid")
            display("Malformed grid: {}", reason)
        }

        UnknownTemplate(value: String) {
            description("unknown maze template")
            display("Unknown template: {}", value)
        }

        InvalidCellValue(line: usize, column: usize, value: String) {
            description("grid cell value is not 0 or 1")
            display("Invalid cell value '{}' at line {}, column {}: expected 0 or 1", value, line, column)
        }

        RaggedRow(line: usize, expected: usize, found: usize) {
            description("grid row length differs from the first row")
            display("Row at line {} has {} cells, expected {}", line, found, expected)
        }
    }
}
