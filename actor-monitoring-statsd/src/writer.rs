#[derive(Clone, Copy)]
enum MetricType {
    Counter,
    Timing,
    Gauge,
}

impl MetricType {
    fn as_bytes(self) -> &'static [u8] {
        match self {
            MetricType::Counter => b"|c",
            MetricType::Timing => b"|ms",
            MetricType::Gauge => b"|g",
        }
    }
}

/// Writes StatsD lines into a reusable buffer.
///
/// Every line has the form `[prefix.]name:value|type[|@rate]` followed by a newline. The sample rate trailer is only
/// written when the rate is below 1.0, as 1.0 is the implied default.
pub(crate) struct LineWriter {
    prefix: Option<String>,
    buf: Vec<u8>,
    int_writer: itoa::Buffer,
    float_writer: ryu::Buffer,
}

impl LineWriter {
    pub fn new(prefix: Option<String>) -> Self {
        LineWriter { prefix, buf: Vec::new(), int_writer: itoa::Buffer::new(), float_writer: ryu::Buffer::new() }
    }

    pub fn write_counter(&mut self, name: &str, delta: i64, sample_rate: f64) -> &[u8] {
        self.write_header(name);
        let value = self.int_writer.format(delta);
        self.buf.extend_from_slice(value.as_bytes());
        self.write_trailer(MetricType::Counter, Some(sample_rate))
    }

    pub fn write_timing(&mut self, name: &str, elapsed_ms: u64, sample_rate: f64) -> &[u8] {
        self.write_header(name);
        let value = self.int_writer.format(elapsed_ms);
        self.buf.extend_from_slice(value.as_bytes());
        self.write_trailer(MetricType::Timing, Some(sample_rate))
    }

    pub fn write_gauge(&mut self, name: &str, value: i64) -> &[u8] {
        self.write_header(name);
        let value = self.int_writer.format(value);
        self.buf.extend_from_slice(value.as_bytes());
        self.write_trailer(MetricType::Gauge, None)
    }

    fn write_header(&mut self, name: &str) {
        self.buf.clear();

        if let Some(prefix) = &self.prefix {
            self.buf.extend_from_slice(prefix.as_bytes());
            self.buf.push(b'.');
        }

        self.buf.extend_from_slice(name.as_bytes());
        self.buf.push(b':');
    }

    fn write_trailer(&mut self, metric_type: MetricType, maybe_sample_rate: Option<f64>) -> &[u8] {
        self.buf.extend_from_slice(metric_type.as_bytes());

        if let Some(sample_rate) = maybe_sample_rate.filter(|rate| *rate < 1.0) {
            let sample_rate_str = self.float_writer.format(sample_rate);
            self.buf.extend_from_slice(b"|@");
            self.buf.extend_from_slice(sample_rate_str.as_bytes());
        }

        self.buf.push(b'\n');
        &self.buf
    }
}
